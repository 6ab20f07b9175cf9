// src/pipeline/fetch.rs

//! `fetch_indicators` operation.

use crate::error::{AppError, RemoteError, Result};
use crate::ingest::DEFAULT_BATCH_SIZE;
use crate::models::{ConnectorConfig, FEED_RECORDS_TRIGGERED, FetchParams, OperationOutput};
use crate::pipeline::OperationContext;
use crate::services::{FeedClient, IP_BLACKLIST_PATH, extract_indicators};

/// Fetch the IP blacklist and either return or forward the indicators.
pub async fn fetch_indicators(
    config: &ConnectorConfig,
    params: &FetchParams,
    ctx: &OperationContext,
) -> std::result::Result<OperationOutput, RemoteError> {
    run_fetch(config, params, ctx).await.map_err(|e| {
        log::error!("{}", e);
        RemoteError::from(e)
    })
}

async fn run_fetch(
    config: &ConnectorConfig,
    params: &FetchParams,
    ctx: &OperationContext,
) -> Result<OperationOutput> {
    let client = FeedClient::new(config)?;
    let body = client.get(IP_BLACKLIST_PATH).await?;
    let indicators = extract_indicators(&body);
    log::info!("Fetched {} unique indicators", indicators.len());

    if !params.output_mode().creates_records() {
        return Ok(OperationOutput::Indicators(indicators));
    }

    let forwarder = ctx
        .forwarder
        .as_ref()
        .ok_or_else(|| AppError::forward("ingest", "no ingest forwarder is available"))?;
    let batch_size = ctx.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);

    let summary = forwarder
        .trigger_ingest(
            &indicators,
            params.create_pb_id.as_deref(),
            &ctx.env,
            batch_size,
        )
        .await?;
    log::debug!(
        "Ingest triggered: {} batches at {}",
        summary.batch_count,
        summary.location
    );

    Ok(OperationOutput::Message(FEED_RECORDS_TRIGGERED.to_string()))
}
