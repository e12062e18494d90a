//! Paginate command implementation.

use clap::Args;
use txq_core::page::PageTraverser;

use crate::config::RunConfig;
use crate::output;

/// Arguments for the paginate command.
#[derive(Args)]
pub struct PaginateArgs {
    /// Listing URL to walk; must return a data/paging envelope
    pub url: String,
}

pub async fn run(args: PaginateArgs, config: &RunConfig) -> i32 {
    let mut traverser = PageTraverser::from_url(&config.client, args.url);

    loop {
        match traverser.next_page().await {
            Ok(Some(page)) => {
                for item in &page.items {
                    println!("{}", serde_json::to_string(item).unwrap());
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
