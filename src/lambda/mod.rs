// src/lambda/mod.rs

//! AWS Lambda handler for the connector.
//!
//! Each invocation names one operation and carries its own connector
//! config and params:
//!
//! ```json
//! {
//!   "operation": "fetch_indicators",
//!   "config": { "server_url": "talosintelligence.com", "verify_ssl": true },
//!   "params": { "output_mode": "Create as Feed Records in FortiSOAR", "create_pb_id": "pb-1" },
//!   "env": {}
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::error::RemoteError;
use crate::ingest::LocalForwarder;
use crate::models::ConnectorConfig;
use crate::pipeline::{self, OperationContext, context::empty_env};

/// Operation name for the connectivity check; not part of the registry.
pub const CHECK_HEALTH: &str = "check_health";

/// Lambda invocation payload.
#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    /// Registered operation name or `check_health`
    pub operation: String,

    /// Connector configuration
    #[serde(default)]
    pub config: ConnectorConfig,

    /// Operation params
    #[serde(default)]
    pub params: Value,

    /// Parent workflow environment, forwarded to ingestion
    #[serde(default = "empty_env")]
    pub env: Value,
}

/// Lambda response payload.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InvokeResponse {
    Success { data: Value },
    Error { message: String },
}

impl From<std::result::Result<Value, RemoteError>> for InvokeResponse {
    fn from(result: std::result::Result<Value, RemoteError>) -> Self {
        match result {
            Ok(data) => InvokeResponse::Success { data },
            Err(e) => InvokeResponse::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Main Lambda handler function.
#[instrument(skip(event))]
pub async fn handler(
    event: LambdaEvent<InvokeRequest>,
) -> std::result::Result<InvokeResponse, LambdaError> {
    let (request, _context) = event.into_parts();
    let ctx = context_from_env().with_env(request.env.clone());
    Ok(dispatch(request, &ctx).await)
}

/// Run the requested operation.
pub async fn dispatch(request: InvokeRequest, ctx: &OperationContext) -> InvokeResponse {
    info!(
        "Invoking {} against {}",
        request.operation,
        request.config.base_url()
    );

    let result = if request.operation == CHECK_HEALTH {
        pipeline::check_health(&request.config)
            .await
            .map(|_| Value::Bool(true))
    } else {
        pipeline::execute(&request.operation, &request.config, request.params, ctx)
            .await
            .and_then(|output| {
                serde_json::to_value(output)
                    .map_err(|e| RemoteError::remote(e.to_string()).with_source(e))
            })
    };

    if let Err(e) = &result {
        error!("Operation {} failed: {}", request.operation, e);
    }
    result.into()
}

/// Resolve the forwarder for the Lambda environment.
///
/// Forwarding is available only when `INGEST_OUTPUT_DIR` is set.
fn context_from_env() -> OperationContext {
    let mut ctx = OperationContext::new();

    if let Ok(dir) = std::env::var("INGEST_OUTPUT_DIR") {
        info!("Ingest forwarder writes to {}", dir);
        ctx = ctx.with_forwarder(Arc::new(LocalForwarder::new(PathBuf::from(dir))));
    }

    if let Ok(size) = std::env::var("INGEST_BATCH_SIZE") {
        ctx.batch_size = parse_batch_size(&size);
    }

    ctx
}

/// Parse `INGEST_BATCH_SIZE`; a bad value falls back to the default size.
fn parse_batch_size(raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!(
                "Ignoring INGEST_BATCH_SIZE={:?}: expected a positive integer, using the default",
                raw
            );
            None
        }
    }
}
