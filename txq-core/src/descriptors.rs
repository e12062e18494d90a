//! Batched record-detail lookup.

use serde_json::Value;
use tracing::warn;

use crate::client::TxClient;
use crate::error::{Result, TxError};

/// Full record detail as returned by the service: an opaque field map,
/// passed through without reordering or dropping fields.
pub type Descriptor = serde_json::Map<String, Value>;

/// Fields requested for every detail lookup.
pub const DETAIL_FIELDS: &[&str] = &[
    "id",
    "indicator",
    "type",
    "added_on",
    "last_updated",
    "confidence",
    "owner",
    "privacy_type",
    "review_status",
    "status",
    "severity",
    "share_level",
    "tags",
    "description",
];

/// Extra field requested when indicator text is wanted in the output.
pub const INDICATOR_TEXT_FIELD: &str = "raw_indicator";

/// Fetch full detail for one batch of record identifiers.
///
/// Issues exactly one GET regardless of `include_indicator_text`; the flag
/// only adds [`INDICATOR_TEXT_FIELD`] to the requested field list. Batch size
/// is the caller's choice. Output order follows the requested identifier
/// order for every identifier present in the response; identifiers the
/// service omitted are reported as a non-fatal warning.
pub async fn fetch_batch(
    client: &TxClient,
    ids: &[String],
    include_indicator_text: bool,
) -> Result<Vec<Descriptor>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut fields: Vec<&str> = DETAIL_FIELDS.to_vec();
    if include_indicator_text {
        fields.push(INDICATOR_TEXT_FIELD);
    }
    let ids_param = ids.join(",");
    let fields_param = fields.join(",");

    let url = client.endpoint("threat_descriptors");
    let body = client
        .get_json(&url, &[("ids", &ids_param), ("fields", &fields_param)])
        .await?;

    let by_id = body
        .as_object()
        .ok_or_else(|| TxError::MalformedEnvelope("detail response is not an object".into()))?;

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(Value::Object(descriptor)) = by_id.get(id) {
            out.push(descriptor.clone());
        }
    }

    if out.len() != ids.len() {
        warn!(
            requested = ids.len(),
            returned = out.len(),
            "detail lookup returned fewer records than requested"
        );
    }

    Ok(out)
}
