//! Look-up-tag-id command implementation.

use clap::Args;
use txq_core::tag::resolve_tag;

use crate::config::RunConfig;
use crate::output;

/// Arguments for the look-up-tag-id command.
#[derive(Args)]
pub struct LookupTagArgs {
    /// Tag name to resolve
    pub tag_name: String,
}

pub async fn run(args: LookupTagArgs, config: &RunConfig) -> i32 {
    match resolve_tag(&config.client, &args.tag_name).await {
        Ok(id) => {
            println!("{}", id);
            0
        }
        Err(e) => {
            output::error(&e.to_string());
            1
        }
    }
}
