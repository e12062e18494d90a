//! HTTP transport against the exchange endpoint.
//!
//! One client per invocation; every request carries the bearer token and a
//! bounded timeout. Calls are issued strictly one at a time by the pipelines
//! above this layer.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TxError};

/// Authenticated HTTP client for the exchange.
pub struct TxClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    show_urls: bool,
}

impl TxClient {
    /// Create a client for the given base URL.
    ///
    /// `timeout_secs` bounds every individual request; a timeout surfaces as
    /// [`TxError::Transport`]. When `show_urls` is set, each request URL is
    /// echoed to stderr before it is sent.
    pub fn new(base_url: &str, token: String, timeout_secs: u64, show_urls: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            show_urls,
        })
    }

    /// Absolute URL for a path under the exchange base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue one GET and parse the JSON body.
    ///
    /// Non-success statuses become [`TxError::RequestFailed`]; an undecodable
    /// body becomes [`TxError::MalformedEnvelope`].
    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let request = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .build()?;
        self.trace("GET", request.url().as_str());

        let response = self.http.execute(request).await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(TxError::RequestFailed {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text)
            .map_err(|e| TxError::MalformedEnvelope(format!("response is not JSON: {}", e)))
    }

    /// Issue one form-encoded POST.
    ///
    /// Returns the status code and raw body for any status: mutation
    /// responses carry their verdict in-band, so callers decide what a
    /// non-200 means.
    pub async fn post_form(
        &self,
        url: &str,
        fields: &BTreeMap<&'static str, String>,
    ) -> Result<(u16, String)> {
        let request = self
            .http
            .post(url)
            .form(fields)
            .bearer_auth(&self.token)
            .build()?;
        self.trace("POST", request.url().as_str());

        let response = self.http.execute(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }

    fn trace(&self, verb: &str, url: &str) {
        debug!(%verb, %url, "issuing request");
        if self.show_urls {
            eprintln!("{} {}", verb, url);
        }
    }
}
