//! Forwarder that records every call instead of ingesting.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use talos_feed::error::Result;
use talos_feed::ingest::{IngestForwarder, IngestSummary, batches};

/// Arguments of one `trigger_ingest` call.
#[derive(Debug, Clone)]
pub struct IngestCall {
    pub indicators: Vec<String>,
    pub playbook_id: Option<String>,
    pub parent_env: Value,
    pub batch_size: usize,
}

#[derive(Default)]
pub struct RecordingForwarder {
    calls: Mutex<Vec<IngestCall>>,
}

impl RecordingForwarder {
    pub fn calls(&self) -> Vec<IngestCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IngestForwarder for RecordingForwarder {
    async fn trigger_ingest(
        &self,
        indicators: &[String],
        playbook_id: Option<&str>,
        parent_env: &Value,
        batch_size: usize,
    ) -> Result<IngestSummary> {
        let batch_count = batches(indicators, batch_size)?.len();
        self.calls.lock().unwrap().push(IngestCall {
            indicators: indicators.to_vec(),
            playbook_id: playbook_id.map(str::to_string),
            parent_env: parent_env.clone(),
            batch_size,
        });
        Ok(IngestSummary {
            indicator_count: indicators.len(),
            batch_count,
            timestamp: Utc::now(),
            location: "recorded".to_string(),
        })
    }
}
