// src/pipeline/health.rs

//! Connectivity check against the feed server.

use crate::error::{RemoteError, Result};
use crate::models::ConnectorConfig;
use crate::services::{FeedClient, IP_BLACKLIST_PATH};

/// Fetch the blacklist document and discard it.
pub async fn check_health(config: &ConnectorConfig) -> std::result::Result<(), RemoteError> {
    run_check(config).await.map_err(|e| {
        log::error!("{}", e);
        RemoteError::from(e)
    })
}

async fn run_check(config: &ConnectorConfig) -> Result<()> {
    let client = FeedClient::new(config)?;
    client.get(IP_BLACKLIST_PATH).await?;
    log::info!("Feed server {} is reachable", client.base_url());
    Ok(())
}
