// src/utils/http.rs

//! HTTP client utilities.

use std::fs;
use std::time::Duration;

use reqwest::Certificate;

use crate::error::{AppError, Result};
use crate::models::{ConnectorConfig, VerifySsl};

/// Create an HTTP client honoring the configured TLS policy.
///
/// No default headers are set and no timeout is applied unless
/// `timeout_secs` is configured.
pub fn create_client(config: &ConnectorConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder = match config.verify_ssl() {
        VerifySsl::Enabled(true) => builder,
        VerifySsl::Enabled(false) => {
            log::warn!("TLS certificate verification is disabled");
            builder.danger_accept_invalid_certs(true)
        }
        VerifySsl::CaBundle(path) => {
            let pem = fs::read(&path).map_err(|e| {
                AppError::config(format!("Cannot read CA bundle {}: {}", path.display(), e))
            })?;
            let certs = Certificate::from_pem_bundle(&pem).map_err(|e| {
                AppError::config(format!("Invalid CA bundle {}: {}", path.display(), e))
            })?;
            if certs.is_empty() {
                return Err(AppError::config(format!(
                    "CA bundle {} holds no certificates",
                    path.display()
                )));
            }
            log::debug!("Loaded {} CA certificates from {}", certs.len(), path.display());
            certs
                .into_iter()
                .fold(builder, |b, cert| b.add_root_certificate(cert))
        }
    };

    Ok(builder.build()?)
}
