// src/pipeline/context.rs

//! Capabilities handed to operations, resolved once at startup.

use std::sync::Arc;

use serde_json::Value;

use crate::ingest::{IngestForwarder, LocalForwarder};
use crate::models::Config;

/// Per-invocation collaborators of an operation.
#[derive(Clone)]
pub struct OperationContext {
    /// Ingestion pipeline, if one is available
    pub forwarder: Option<Arc<dyn IngestForwarder>>,

    /// Environment of the invoking workflow, passed on to the forwarder
    pub env: Value,

    /// Indicators per forwarded batch
    pub batch_size: Option<usize>,
}

/// Parent environment used when the caller supplies none.
pub(crate) fn empty_env() -> Value {
    Value::Object(Default::default())
}

impl Default for OperationContext {
    fn default() -> Self {
        Self {
            forwarder: None,
            env: empty_env(),
            batch_size: None,
        }
    }
}

impl OperationContext {
    /// Context without a forwarder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the forwarder from configuration.
    pub fn from_config(config: &Config) -> Self {
        let forwarder: Option<Arc<dyn IngestForwarder>> =
            config.ingest.output_dir.as_ref().map(|dir| {
                log::debug!("Ingest forwarder writes to {}", dir.display());
                Arc::new(LocalForwarder::new(dir)) as Arc<dyn IngestForwarder>
            });
        if forwarder.is_none() {
            log::debug!("Ingest forwarder unavailable: ingest.output_dir is not set");
        }

        Self {
            forwarder,
            env: empty_env(),
            batch_size: Some(config.ingest.batch_size),
        }
    }

    pub fn with_forwarder(mut self, forwarder: Arc<dyn IngestForwarder>) -> Self {
        self.forwarder = Some(forwarder);
        self
    }

    pub fn with_env(mut self, env: Value) -> Self {
        self.env = env;
        self
    }

    pub fn has_forwarder(&self) -> bool {
        self.forwarder.is_some()
    }
}

impl std::fmt::Debug for OperationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationContext")
            .field("forwarder", &self.has_forwarder())
            .field("env", &self.env)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}
