//! Ids-to-details command implementation.

use std::io::BufRead;

use clap::Args;
use txq_core::descriptors::fetch_batch;

use crate::config::RunConfig;
use crate::output;

/// Arguments for the ids-to-details command.
#[derive(Args)]
pub struct IdsToDetailsArgs {
    /// Record identifiers to fetch
    pub ids: Vec<String>,

    /// Read record identifiers from standard input, one per line
    #[arg(short = 'I', long)]
    pub from_stdin: bool,

    /// Identifiers per detail request
    #[arg(long, default_value = "1")]
    pub page_size: usize,

    /// Include the raw indicator text in the output
    #[arg(long)]
    pub indicator_text: bool,
}

pub async fn run(args: IdsToDetailsArgs, config: &RunConfig) -> i32 {
    let ids = if args.from_stdin {
        if !args.ids.is_empty() {
            output::error("give identifiers either as arguments or via --from-stdin, not both");
            return 1;
        }
        let mut ids = Vec::new();
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    let id = line.trim();
                    if !id.is_empty() {
                        ids.push(id.to_string());
                    }
                }
                Err(e) => {
                    output::error(&format!("failed to read standard input: {}", e));
                    return 1;
                }
            }
        }
        ids
    } else if args.ids.is_empty() {
        output::error("no record identifiers given");
        return 1;
    } else {
        args.ids
    };

    let batch_size = args.page_size.max(1);
    for batch in ids.chunks(batch_size) {
        match fetch_batch(&config.client, batch, args.indicator_text).await {
            Ok(descriptors) => {
                for descriptor in descriptors {
                    println!("{}", serde_json::to_string(&descriptor).unwrap());
                }
            }
            Err(e) => {
                output::error(&e.to_string());
                return 1;
            }
        }
    }

    0
}
