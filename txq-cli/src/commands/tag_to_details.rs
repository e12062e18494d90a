//! Tag-to-details command implementation.
//!
//! Composition of the read pipelines: resolve the tag, walk its listing,
//! and fetch detail for each identifier batch as it arrives.

use clap::Args;
use txq_core::descriptors::fetch_batch;
use txq_core::page::{PageQuery, PageTraverser};
use txq_core::tag::resolve_tag;

use crate::config::RunConfig;
use crate::output;

/// Arguments for the tag-to-details command.
#[derive(Args)]
pub struct TagToDetailsArgs {
    /// Tag name whose records to fetch
    pub tag_name: String,

    /// Identifiers per page request and per detail request
    #[arg(long, default_value = "10")]
    pub page_size: u32,

    /// Lower time bound, passed through to the service
    #[arg(long)]
    pub since: Option<String>,

    /// Upper time bound, passed through to the service
    #[arg(long)]
    pub until: Option<String>,

    /// Include the raw indicator text in the output
    #[arg(long)]
    pub indicator_text: bool,
}

pub async fn run(args: TagToDetailsArgs, config: &RunConfig) -> i32 {
    let tag_id = match resolve_tag(&config.client, &args.tag_name).await {
        Ok(id) => id,
        Err(e) => {
            output::error(&e.to_string());
            return 1;
        }
    };

    let query = PageQuery {
        page_size: args.page_size,
        since: args.since,
        until: args.until,
    };
    let mut traverser = PageTraverser::for_tag(&config.client, &tag_id, &query);

    loop {
        let page = match traverser.next_page().await {
            Ok(Some(page)) => page,
            Ok(None) => return 0,
            Err(e) => {
                output::error(&e.to_string());
                return 1;
            }
        };

        let batch = page.identifiers();
        match fetch_batch(&config.client, &batch, args.indicator_text).await {
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
}
