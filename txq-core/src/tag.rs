//! Tag name resolution.

use serde_json::Value;

use crate::client::TxClient;
use crate::error::{Result, TxError};

/// Resolve a tag name to its numeric identifier.
///
/// Issues exactly one GET against the tag lookup endpoint. The service does
/// substring matching, so the result is filtered down to exact name matches
/// locally; anything other than exactly one exact match is fatal.
pub async fn resolve_tag(client: &TxClient, name: &str) -> Result<String> {
    let url = client.endpoint("threat_tags");
    let body = client.get_json(&url, &[("text", name)]).await?;

    let data = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| TxError::MalformedEnvelope("tag lookup response missing 'data'".into()))?;

    let exact: Vec<&Value> = data
        .iter()
        .filter(|entry| entry.get("name").and_then(Value::as_str) == Some(name))
        .collect();

    match exact.len() {
        0 => Err(TxError::TagNotFound(name.to_string())),
        1 => exact[0]
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| TxError::MalformedEnvelope("tag entry missing 'id'".into())),
        count => Err(TxError::AmbiguousTag {
            name: name.to_string(),
            count,
        }),
    }
}
