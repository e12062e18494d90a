//! Submit and update command implementations.
//!
//! Both verbs drive the same per-record state machine: Build (local field
//! validation, no network), optional dry run, Send (one POST), Report. In
//! streamed mode the first validation error or non-200 stops the whole
//! stream; later records are never sent. That fail-fast policy is
//! deliberate.

use std::io::BufRead;

use clap::Args;
use txq_core::{MutationResult, MutationSubmitter, PostParams, Result, TxError};

use crate::config::RunConfig;
use crate::output;

/// Record fields shared by submit and update.
#[derive(Args)]
pub struct FieldArgs {
    /// Indicator type (e.g. HASH_MD5, URI, DOMAIN)
    #[arg(short = 't', long)]
    pub r#type: Option<String>,

    /// Human-readable description
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Share level (e.g. RED, AMBER, GREEN, WHITE)
    #[arg(short = 'l', long)]
    pub share_level: Option<String>,

    /// Privacy type (e.g. VISIBLE, HAS_PRIVACY_GROUP)
    #[arg(short = 'p', long)]
    pub privacy_type: Option<String>,

    /// Comma-separated privacy members
    #[arg(short = 'm', long)]
    pub privacy_members: Option<String>,

    /// Severity (e.g. INFO, WARNING, SUSPICIOUS, SEVERE)
    #[arg(short = 's', long)]
    pub severity: Option<String>,

    /// Status (e.g. MALICIOUS, NON_MALICIOUS, UNKNOWN)
    #[arg(long)]
    pub status: Option<String>,

    /// Confidence percentage (0-100)
    #[arg(long)]
    pub confidence: Option<String>,

    /// Review status
    #[arg(long)]
    pub review_status: Option<String>,

    /// Comma-separated tags to set on the record
    #[arg(long)]
    pub tags: Option<String>,

    /// First-active timestamp, passed through to the service
    #[arg(long)]
    pub first_active: Option<String>,

    /// Last-active timestamp, passed through to the service
    #[arg(long)]
    pub last_active: Option<String>,

    /// Expiration timestamp, passed through to the service
    #[arg(long)]
    pub expired_on: Option<String>,

    /// Comma-separated related record identifiers
    #[arg(long)]
    pub related_ids: Option<String>,
}

impl FieldArgs {
    /// Build the base field map every record of this invocation starts from.
    fn base_params(&self) -> Result<PostParams> {
        let mut params = PostParams::default();
        let pairs: [(&str, &Option<String>); 14] = [
            ("type", &self.r#type),
            ("description", &self.description),
            ("share_level", &self.share_level),
            ("privacy_type", &self.privacy_type),
            ("privacy_members", &self.privacy_members),
            ("severity", &self.severity),
            ("status", &self.status),
            ("confidence", &self.confidence),
            ("review_status", &self.review_status),
            ("tags", &self.tags),
            ("first_active", &self.first_active),
            ("last_active", &self.last_active),
            ("expired_on", &self.expired_on),
            ("related_ids", &self.related_ids),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                params.set(key, value.as_str())?;
            }
        }
        Ok(params)
    }
}

/// Arguments for the submit command.
#[derive(Args)]
pub struct SubmitArgs {
    /// Indicator value for a single submission
    #[arg(short = 'i', long)]
    pub indicator: Option<String>,

    /// Read one indicator per line from standard input
    #[arg(short = 'I', long)]
    pub from_stdin: bool,

    /// Build each request but do not send it
    #[arg(short = 'N', long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Identifier of the record to update
    #[arg(short = 'n', long)]
    pub id: Option<String>,

    /// Read one record identifier per line from standard input
    #[arg(short = 'I', long)]
    pub from_stdin: bool,

    /// Build each request but do not send it
    #[arg(short = 'N', long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub fields: FieldArgs,
}

enum RecordSource {
    Single(String),
    Stdin,
}

/// Exactly one of the single-record flag and stdin streaming must be chosen.
fn record_source(single: Option<String>, from_stdin: bool) -> Result<RecordSource> {
    match (single, from_stdin) {
        (Some(value), false) => Ok(RecordSource::Single(value)),
        (None, true) => Ok(RecordSource::Stdin),
        _ => Err(TxError::InputMode),
    }
}

pub async fn run_submit(args: SubmitArgs, config: &RunConfig) -> i32 {
    let source = match record_source(args.indicator, args.from_stdin) {
        Ok(s) => s,
        Err(e) => {
            output::error(&e.to_string());
            return 1;
        }
    };
    let base = match args.fields.base_params() {
        Ok(p) => p,
        Err(e) => {
            output::error(&e.to_string());
            return 1;
        }
    };

    let submitter = MutationSubmitter::new(&config.client, args.dry_run);
    drive(source, |indicator| {
        // Each record reuses the base map; only the indicator changes.
        let mut params = base.clone();
        let submitter = &submitter;
        async move {
            params.set("indicator", indicator.as_str())?;
            submitter.submit(&params).await
        }
    })
    .await
}

pub async fn run_update(args: UpdateArgs, config: &RunConfig) -> i32 {
    let source = match record_source(args.id, args.from_stdin) {
        Ok(s) => s,
        Err(e) => {
            output::error(&e.to_string());
            return 1;
        }
    };
    if let RecordSource::Single(id) = &source {
        if id.trim().is_empty() {
            output::error("record identifier must not be empty");
            return 1;
        }
    }
    let base = match args.fields.base_params() {
        Ok(p) => p,
        Err(e) => {
            output::error(&e.to_string());
            return 1;
        }
    };

    let submitter = MutationSubmitter::new(&config.client, args.dry_run);
    drive(source, |id| {
        let params = base.clone();
        let submitter = &submitter;
        async move { submitter.update(&id, &params).await }
    })
    .await
}

/// Run one Build→Send→Report cycle per record, stopping the whole stream at
/// the first non-zero exit.
async fn drive<F, Fut>(source: RecordSource, mut send_one: F) -> i32
where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = Result<Option<MutationResult>>>,
{
    match source {
        RecordSource::Single(value) => report(&value, send_one(value.clone()).await),
        RecordSource::Stdin => {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        output::error(&format!("failed to read standard input: {}", e));
                        return 1;
                    }
                };
                let value = line.trim();
                if value.is_empty() {
                    continue;
                }
                let code = report(value, send_one(value.to_string()).await);
                if code != 0 {
                    return code;
                }
            }
            0
        }
    }
}

fn report(record: &str, outcome: Result<Option<MutationResult>>) -> i32 {
    match outcome {
        // Dry run: the request was built and validated but never sent.
        Ok(None) => {
            output::info(&format!("dry run: '{}' not sent", record));
            0
        }
        Ok(Some(result)) => {
            if let Some(message) = result.validation_error {
                output::error(&message);
                return 1;
            }
            println!("{}", result.body);
            if result.status_code != 200 {
                return 1;
            }
            0
        }
        Err(e) => {
            output::error(&e.to_string());
            1
        }
    }
}
