// src/services/feed.rs

//! Feed client service.
//!
//! Issues one request against the feed server and translates every failure
//! into a [`RemoteError`].

use reqwest::{Client, Method};

use crate::error::{
    AppError, RemoteError, STATUS_TABLE, StatusTable, translate_status, translate_transport,
};
use crate::models::{ConnectorConfig, ErrorMessages};
use crate::utils::{endpoint, http};

/// Path of the IP blacklist document on the feed server.
pub const IP_BLACKLIST_PATH: &str = "/documents/ip-blacklist";

/// HTTP client bound to one feed server.
pub struct FeedClient {
    base_url: String,
    client: Client,
    messages: ErrorMessages,
    status_table: &'static StatusTable,
}

impl FeedClient {
    /// Create a client for the configured server.
    ///
    /// Fails only on local setup problems (e.g. unreadable CA bundle); the
    /// server is not contacted.
    pub fn new(config: &ConnectorConfig) -> Result<Self, AppError> {
        Ok(Self {
            base_url: config.base_url(),
            client: http::create_client(config)?,
            messages: config.messages.clone(),
            status_table: STATUS_TABLE,
        })
    }

    /// Replace the status-to-message table.
    pub fn with_status_table(mut self, table: &'static StatusTable) -> Self {
        self.status_table = table;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a path and return the body.
    pub async fn get(&self, path: &str) -> Result<String, RemoteError> {
        self.fetch(path, &[], None, Method::GET).await
    }

    /// Send a request to `path` and return the response body as text.
    pub async fn fetch(
        &self,
        path: &str,
        params: &[(&str, &str)],
        body: Option<String>,
        method: Method,
    ) -> Result<String, RemoteError> {
        let url = endpoint(&self.base_url, path);
        log::debug!("API Request Endpoint: {}", url);
        log::debug!("API Request Parameters: {:?}", params);

        let mut request = self.client.request(method, &url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        log::debug!("API Status Code: {}", status.as_u16());

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        log::debug!("API Response: {}", text);

        if status.is_client_error() || status.is_server_error() {
            log::error!("Error: {}", text);
            return Err(translate_status(
                self.status_table,
                &self.messages,
                status,
                &text,
            ));
        }

        Ok(text)
    }

    fn transport_error(&self, err: reqwest::Error) -> RemoteError {
        log::error!("{}", err);
        translate_transport(&self.messages, err)
    }
}
