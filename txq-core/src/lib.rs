//! # txq-core
//!
//! Client library for a tag-indexed threat-intelligence exchange.
//!
//! The exchange groups threat records ("descriptors") under named tags and
//! serves them through cursor-paginated listings. This crate implements the
//! two pipelines a command-line client needs:
//!
//! - **Retrieval**: [`tag::resolve_tag`] turns a tag name into its numeric
//!   identifier, [`page::PageTraverser`] walks the tag's cursor-paginated
//!   listing one page at a time, and [`descriptors::fetch_batch`] pulls full
//!   record detail for each identifier batch.
//! - **Mutation**: [`mutate::MutationSubmitter`] creates or updates records
//!   from a validated [`mutate::PostParams`] field map, surfacing in-band
//!   validation errors alongside the raw response body.
//!
//! Every operation is a single awaited HTTP call against a [`client::TxClient`];
//! there is no retry logic, no caching, and no state that outlives one command
//! invocation.

pub mod client;
pub mod descriptors;
pub mod error;
pub mod mutate;
pub mod page;
pub mod tag;

// Re-export main types for convenience
pub use client::TxClient;
pub use error::{Result, TxError};
pub use mutate::{MutationResult, MutationSubmitter, PostParams};
pub use page::{Page, PageQuery, PageTraverser};
