//! Error types for the exchange client.
//!
//! Remote validation failures and non-200 mutation responses are *not* errors
//! here: the response body must still be printable on those paths, so they
//! travel inside [`crate::mutate::MutationResult`] instead.

use thiserror::Error;

/// Errors that can occur while talking to the exchange.
#[derive(Debug, Error)]
pub enum TxError {
    /// Tag name resolved to zero exact matches.
    #[error("tag '{0}' not found on the exchange")]
    TagNotFound(String),

    /// Tag name resolved to more than one exact match.
    #[error("tag '{name}' is ambiguous: {count} exact matches")]
    AmbiguousTag {
        /// The tag name that was looked up
        name: String,
        /// Number of exact matches returned
        count: usize,
    },

    /// Network or transport failure, including per-request timeouts.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A read request came back with a non-success status.
    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// Response body did not match the expected envelope shape.
    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),

    /// The access-token environment variable is unset or empty.
    #[error("access token missing: environment variable '{0}' is unset or empty")]
    MissingToken(String),

    /// A mutation field key outside the recognized set.
    #[error("unrecognized field '{0}'")]
    UnknownField(String),

    /// A mandatory mutation field was not supplied.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// Neither or both of the single-record flag and stdin streaming were chosen.
    #[error("exactly one of a single-record flag or --from-stdin must be given")]
    InputMode,
}

/// Result type alias for exchange operations.
pub type Result<T> = std::result::Result<T, TxError>;
