#![allow(dead_code)]
//! Shared test utilities for connector integration harnesses.
//!
//! Import via `mod common; use common::*;` at the top of each harness file.

pub mod fake_feed;
pub mod recording_forwarder;

pub use fake_feed::*;
pub use recording_forwarder::*;

use talos_feed::models::ConnectorConfig;

/// Connector config pointing at a local test server.
pub fn connector_for(base_url: &str) -> ConnectorConfig {
    ConnectorConfig::new(base_url)
}

/// Base URL of a local port with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
