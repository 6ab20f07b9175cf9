//! Ingestion forwarding for extracted indicators.
//!
//! The forwarder is an optional capability: operations receive
//! `Option<Arc<dyn IngestForwarder>>` and fail only when record creation is
//! requested without one.
//!
//! ## Batch Layout (LocalForwarder)
//!
//! ```text
//! {output_dir}/
//! └── {playbook_id | default}/
//!     └── {run: created_at as %Y%m%dT%H%M%S%.3fZ}/
//!         ├── batch-0001.json
//!         └── batch-0002.json
//! ```
//!
//! Every run gets a fresh directory, so a later run never overwrites or
//! mixes with batches a downstream reader has not consumed yet.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

// Re-export for convenience
pub use local::LocalForwarder;

/// Batch size used when creating feed records.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// One forwarded chunk of indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestBatch {
    pub playbook_id: Option<String>,
    pub parent_env: Value,
    /// 1-based position of this batch
    pub batch_index: usize,
    pub batch_count: usize,
    pub created_at: DateTime<Utc>,
    pub indicators: Vec<String>,
}

/// Metadata about a forwarding run.
#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub indicator_count: usize,
    pub batch_count: usize,
    pub timestamp: DateTime<Utc>,
    /// Where the batches went (a directory for `LocalForwarder`)
    pub location: String,
}

/// Trait for ingestion pipelines that turn indicators into records.
#[async_trait]
pub trait IngestForwarder: Send + Sync {
    /// Hand the indicators to the pipeline in chunks of `batch_size`.
    async fn trigger_ingest(
        &self,
        indicators: &[String],
        playbook_id: Option<&str>,
        parent_env: &Value,
        batch_size: usize,
    ) -> Result<IngestSummary>;
}

/// Split indicators into consecutive chunks of at most `batch_size`.
pub fn batches(indicators: &[String], batch_size: usize) -> Result<Vec<&[String]>> {
    if batch_size == 0 {
        return Err(AppError::validation("batch_size must be > 0"));
    }
    Ok(indicators.chunks(batch_size).collect())
}
