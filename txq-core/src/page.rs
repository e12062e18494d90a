//! Cursor-based pagination over exchange listings.
//!
//! Listing responses share one envelope: `{"data": [...], "paging":
//! {"next": <url>}}`. An absent `paging.next` is the terminal condition.
//! Each traversal issues fresh network calls and cannot be restarted.

use serde_json::Value;

use crate::client::TxClient;
use crate::error::{Result, TxError};

/// Filters and sizing for the first page request of a tag listing.
///
/// Later pages ignore these: the cursor URL already encodes them.
#[derive(Debug, Clone)]
pub struct PageQuery {
    /// Identifiers per page (`limit` query parameter).
    pub page_size: u32,
    /// Lower time bound, passed through verbatim.
    pub since: Option<String>,
    /// Upper time bound, passed through verbatim.
    pub until: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page_size: 10,
            since: None,
            until: None,
        }
    }
}

/// One page of a listing, exactly as the service returned it.
#[derive(Debug, Clone)]
pub struct Page {
    /// Raw listing entries in service order; never re-sorted client-side.
    pub items: Vec<Value>,
    /// Cursor URL for the next page, if one exists.
    pub next_cursor: Option<String>,
}

impl Page {
    /// Project the batch of record identifiers, preserving service order.
    pub fn identifiers(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}

enum NextRequest {
    Edge { url: String, query: Vec<(String, String)> },
    Cursor(String),
    Done,
}

/// Lazy walker over a cursor-paginated listing.
///
/// Each [`next_page`](Self::next_page) call issues exactly one GET. The
/// sequence is finite (the service eventually omits the cursor) and a
/// malformed envelope aborts the whole traversal.
pub struct PageTraverser<'a> {
    client: &'a TxClient,
    next: NextRequest,
}

impl<'a> PageTraverser<'a> {
    /// Traverse the tagged-objects edge of a resolved tag.
    pub fn for_tag(client: &'a TxClient, tag_id: &str, query: &PageQuery) -> Self {
        let url = client.endpoint(&format!("{}/tagged_objects", tag_id));
        let mut params = vec![("limit".to_string(), query.page_size.to_string())];
        if let Some(since) = &query.since {
            params.push(("since".to_string(), since.clone()));
        }
        if let Some(until) = &query.until {
            params.push(("until".to_string(), until.clone()));
        }
        Self {
            client,
            next: NextRequest::Edge { url, query: params },
        }
    }

    /// Traverse starting from a literal listing URL (a saved cursor, or any
    /// endpoint that speaks the data/paging envelope).
    pub fn from_url(client: &'a TxClient, url: impl Into<String>) -> Self {
        Self {
            client,
            next: NextRequest::Cursor(url.into()),
        }
    }

    /// Fetch the next page, or `None` once the chain is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        let body = match std::mem::replace(&mut self.next, NextRequest::Done) {
            NextRequest::Done => return Ok(None),
            NextRequest::Edge { url, query } => {
                let params: Vec<(&str, &str)> = query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                self.client.get_json(&url, &params).await?
            }
            // The cursor already encodes filters and page size; use it verbatim.
            NextRequest::Cursor(url) => self.client.get_json(&url, &[]).await?,
        };

        let items = body
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| TxError::MalformedEnvelope("listing response missing 'data'".into()))?;

        let next_cursor = body
            .pointer("/paging/next")
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(cursor) = &next_cursor {
            self.next = NextRequest::Cursor(cursor.clone());
        }

        Ok(Some(Page { items, next_cursor }))
    }
}
