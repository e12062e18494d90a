//! Per-invocation run configuration.
//!
//! Built once from the global flags and the environment, then passed by
//! reference into every pipeline. Nothing here mutates after construction.

use clap::Args;
use txq_core::{Result, TxClient, TxError};

/// Default base URL of the exchange API.
pub const DEFAULT_BASE_URL: &str = "https://graph.threatexchange.net/v1";

/// Default environment variable holding the access token.
pub const DEFAULT_TOKEN_VAR: &str = "TX_ACCESS_TOKEN";

/// Global flags shared by every verb.
#[derive(Args)]
pub struct GlobalArgs {
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Echo every request URL to stderr
    #[arg(long, global = true)]
    pub show_urls: bool,

    /// Name of the environment variable holding the access token
    #[arg(long, default_value = DEFAULT_TOKEN_VAR, global = true)]
    pub token_var: String,

    /// Base URL of the exchange API
    #[arg(long, default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    pub timeout: u64,
}

/// Immutable configuration for one command invocation.
pub struct RunConfig {
    pub client: TxClient,
}

impl RunConfig {
    /// Read the token and build the authenticated client.
    ///
    /// Fails before any network call when the token variable is unset or
    /// empty.
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let token = std::env::var(&args.token_var)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TxError::MissingToken(args.token_var.clone()))?;
        let client = TxClient::new(&args.base_url, token, args.timeout, args.show_urls)?;
        tracing::debug!(base_url = %args.base_url, timeout = args.timeout, "configured exchange client");
        Ok(Self { client })
    }
}
