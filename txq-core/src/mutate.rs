//! Record submission and update.
//!
//! Both verbs share one component; they differ only in endpoint and
//! mandatory-field set. A record goes through Build (field validation, no
//! network), optional dry run (request never sent), and Send (one POST).
//! The verdict travels back in a [`MutationResult`] so callers can print the
//! body even on failure paths.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::client::TxClient;
use crate::error::{Result, TxError};

/// The closed set of field keys a mutation request may carry.
pub const RECOGNIZED_FIELDS: &[&str] = &[
    "indicator",
    "type",
    "description",
    "share_level",
    "privacy_type",
    "privacy_members",
    "severity",
    "status",
    "confidence",
    "review_status",
    "tags",
    "first_active",
    "last_active",
    "expired_on",
    "related_ids",
];

/// Fields that must be present before a submit request is issued.
pub const SUBMIT_REQUIRED: &[&str] = &[
    "indicator",
    "type",
    "description",
    "share_level",
    "privacy_type",
    "severity",
];

/// Field map for one outbound mutation request.
///
/// Only keys from [`RECOGNIZED_FIELDS`] are accepted; required-field checks
/// run before any request is built, so a `PostParams` that reaches the wire
/// is never partially valid.
#[derive(Debug, Clone, Default)]
pub struct PostParams {
    fields: BTreeMap<&'static str, String>,
}

impl PostParams {
    /// Set a field, rejecting keys outside the recognized set.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let canonical = RECOGNIZED_FIELDS
            .iter()
            .find(|k| **k == key)
            .ok_or_else(|| TxError::UnknownField(key.to_string()))?;
        self.fields.insert(canonical, value.into());
        Ok(())
    }

    /// Check that every key in `required` is present.
    pub fn require(&self, required: &[&'static str]) -> Result<()> {
        for key in required {
            if !self.fields.contains_key(key) {
                return Err(TxError::MissingField(key));
            }
        }
        Ok(())
    }

    /// The fields as they will be form-encoded.
    pub fn fields(&self) -> &BTreeMap<&'static str, String> {
        &self.fields
    }
}

/// Outcome of one mutation request.
///
/// When `validation_error` is present the service rejected the record's
/// field values; `body` and `status_code` are advisory only on that path.
#[derive(Debug)]
pub struct MutationResult {
    /// In-band validation message, if the service rejected the record.
    pub validation_error: Option<String>,
    /// Raw response body.
    pub body: String,
    /// HTTP status code.
    pub status_code: u16,
}

impl MutationResult {
    /// Parse a raw response into a result, extracting any in-band
    /// `error.message` as the validation verdict.
    pub fn from_response(status_code: u16, body: String) -> Self {
        let validation_error = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
        Self {
            validation_error,
            body,
            status_code,
        }
    }
}

/// Sends submit and update requests, one POST per record.
pub struct MutationSubmitter<'a> {
    client: &'a TxClient,
    dry_run: bool,
}

impl<'a> MutationSubmitter<'a> {
    pub fn new(client: &'a TxClient, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// Create a new record. Mandatory fields are checked before anything is
    /// sent, so the check fires in dry-run mode too.
    pub async fn submit(&self, params: &PostParams) -> Result<Option<MutationResult>> {
        params.require(SUBMIT_REQUIRED)?;
        let url = self.client.endpoint("threat_descriptors");
        self.send(&url, params).await
    }

    /// Mutate an existing record in place.
    pub async fn update(
        &self,
        descriptor_id: &str,
        params: &PostParams,
    ) -> Result<Option<MutationResult>> {
        let url = self.client.endpoint(descriptor_id);
        self.send(&url, params).await
    }

    /// Returns `None` in dry-run mode: the request is built and validated but
    /// never transmitted.
    async fn send(&self, url: &str, params: &PostParams) -> Result<Option<MutationResult>> {
        if self.dry_run {
            debug!(%url, "dry run, skipping POST");
            return Ok(None);
        }
        let (status_code, body) = self.client.post_form(url, params.fields()).await?;
        Ok(Some(MutationResult::from_response(status_code, body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_rejects_unrecognized_keys() {
        let mut params = PostParams::default();
        assert!(params.set("indicator", "example.com").is_ok());
        let err = params.set("favorite_color", "blue").unwrap_err();
        assert!(matches!(err, TxError::UnknownField(key) if key == "favorite_color"));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut params = PostParams::default();
        params.set("indicator", "first").unwrap();
        params.set("indicator", "second").unwrap();
        assert_eq!(params.fields().get("indicator").map(String::as_str), Some("second"));
    }

    #[test]
    fn require_reports_first_missing_field() {
        let mut params = PostParams::default();
        params.set("indicator", "example.com").unwrap();
        params.set("type", "DOMAIN").unwrap();
        let err = params.require(SUBMIT_REQUIRED).unwrap_err();
        assert!(matches!(err, TxError::MissingField("description")));
    }

    #[test]
    fn require_passes_with_full_submit_set() {
        let mut params = PostParams::default();
        for key in SUBMIT_REQUIRED {
            params.set(key, "x").unwrap();
        }
        assert!(params.require(SUBMIT_REQUIRED).is_ok());
    }

    #[test]
    fn from_response_extracts_in_band_validation_error() {
        let body = r#"{"error":{"message":"Invalid share level","code":100}}"#;
        let result = MutationResult::from_response(400, body.to_string());
        assert_eq!(result.validation_error.as_deref(), Some("Invalid share level"));
        assert_eq!(result.status_code, 400);
    }

    #[test]
    fn from_response_without_error_has_no_verdict() {
        let body = r#"{"success":true,"id":"123"}"#;
        let result = MutationResult::from_response(200, body.to_string());
        assert!(result.validation_error.is_none());
        assert_eq!(result.body, body);
    }

    #[test]
    fn from_response_tolerates_non_json_body() {
        let result = MutationResult::from_response(502, "Bad Gateway".to_string());
        assert!(result.validation_error.is_none());
        assert_eq!(result.status_code, 502);
    }
}
