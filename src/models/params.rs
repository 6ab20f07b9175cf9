//! Operation parameters and results.

use serde::{Deserialize, Serialize};

/// Selector value that switches `fetch_indicators` to record creation.
pub const CREATE_FEED_RECORDS: &str = "Create as Feed Records in FortiSOAR";

/// Returned instead of the indicator list once the forwarder accepted it.
pub const FEED_RECORDS_TRIGGERED: &str = "Successfully triggered playbooks to create feed records";

/// What `fetch_indicators` does with the extracted indicators.
///
/// Only read from params. The default has no selector text of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum OutputMode {
    /// Hand the list back to the caller
    #[default]
    ReturnIndicators,
    /// Forward to the ingestion pipeline
    CreateFeedRecords,
    /// Any other selector; behaves like `ReturnIndicators`
    Other(String),
}

impl OutputMode {
    pub fn creates_records(&self) -> bool {
        matches!(self, OutputMode::CreateFeedRecords)
    }
}

impl From<String> for OutputMode {
    fn from(value: String) -> Self {
        if value == CREATE_FEED_RECORDS {
            OutputMode::CreateFeedRecords
        } else {
            OutputMode::Other(value)
        }
    }
}

/// Parameters accepted by `fetch_indicators`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchParams {
    #[serde(default)]
    pub output_mode: Option<OutputMode>,

    /// Playbook that creates the feed records
    #[serde(default)]
    pub create_pb_id: Option<String>,
}

impl FetchParams {
    pub fn output_mode(&self) -> &OutputMode {
        static RETURN: OutputMode = OutputMode::ReturnIndicators;
        self.output_mode.as_ref().unwrap_or(&RETURN)
    }
}

/// Result of a connector operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Indicators(Vec<String>),
    Message(String),
}
