// src/models/mod.rs

//! Domain models for the feed connector.

mod config;
mod params;

// Re-export all public types
pub use config::{
    Config, ConnectorConfig, ErrorMessages, IngestConfig, LoggingConfig, VerifySsl,
};
pub use params::{
    CREATE_FEED_RECORDS, FEED_RECORDS_TRIGGERED, FetchParams, OperationOutput, OutputMode,
};
