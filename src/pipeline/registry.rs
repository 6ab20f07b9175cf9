// src/pipeline/registry.rs

//! Named operations exposed to the host platform.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::RemoteError;
use crate::models::{ConnectorConfig, FetchParams, OperationOutput};
use crate::pipeline::{OperationContext, fetch_indicators};

/// Operations callable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchIndicators,
}

impl Operation {
    /// Every registered operation.
    pub const ALL: &'static [Operation] = &[Operation::FetchIndicators];

    pub fn name(self) -> &'static str {
        match self {
            Operation::FetchIndicators => "fetch_indicators",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Run this operation with raw JSON params.
    pub async fn run(
        self,
        config: &ConnectorConfig,
        params: Value,
        ctx: &OperationContext,
    ) -> Result<OperationOutput, RemoteError> {
        match self {
            Operation::FetchIndicators => {
                let params = parse_params::<FetchParams>(params)?;
                fetch_indicators(config, &params, ctx).await
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| RemoteError::remote(format!("Unknown operation: {s}")))
    }
}

/// Null params behave like an empty object.
fn parse_params<T: serde::de::DeserializeOwned + Default>(params: Value) -> Result<T, RemoteError> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params).map_err(|e| {
        log::error!("Invalid operation params: {}", e);
        RemoteError::remote(format!("Invalid params: {e}")).with_source(e)
    })
}

/// Look up an operation by name and run it.
pub async fn execute(
    name: &str,
    config: &ConnectorConfig,
    params: Value,
    ctx: &OperationContext,
) -> Result<OperationOutput, RemoteError> {
    let operation: Operation = name.parse()?;
    log::debug!("Executing operation {}", operation);
    operation.run(config, params, ctx).await
}
