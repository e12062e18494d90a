//! Tag-to-ids command implementation.

use clap::Args;
use txq_core::page::{PageQuery, PageTraverser};
use txq_core::tag::resolve_tag;

use crate::config::RunConfig;
use crate::output;

/// Arguments for the tag-to-ids command.
#[derive(Args)]
pub struct TagToIdsArgs {
    /// Tag name whose record identifiers to list
    pub tag_name: String,

    /// Identifiers per page request
    #[arg(long, default_value = "10")]
    pub page_size: u32,

    /// Lower time bound, passed through to the service
    #[arg(long)]
    pub since: Option<String>,

    /// Upper time bound, passed through to the service
    #[arg(long)]
    pub until: Option<String>,
}

pub async fn run(args: TagToIdsArgs, config: &RunConfig) -> i32 {
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
        match traverser.next_page().await {
            Ok(Some(page)) => {
                for id in page.identifiers() {
                    println!("{}", id);
                }
            }
            Ok(None) => return 0,
            Err(e) => {
                output::error(&e.to_string());
                return 1;
            }
        }
    }
}
