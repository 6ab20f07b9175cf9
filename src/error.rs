// src/error.rs

//! Unified error handling for the feed connector.
//!
//! Two layers:
//! - [`AppError`]: everything that can go wrong inside the crate
//!   (config, I/O, HTTP, serialization, forwarding).
//! - [`RemoteError`]: the single user-facing error surfaced by operations.
//!   It carries a fixed message chosen by [`ErrorKind`] and keeps the
//!   original cause for diagnostics.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::models::ErrorMessages;

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Boxed underlying cause kept on a [`RemoteError`].
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Failure already translated into a user-facing message
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Ingestion forwarding error
    #[error("Forward error for {context}: {message}")]
    Forward { context: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a forwarding error with context.
    pub fn forward(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Forward {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

/// Closed set of failure classes a remote call can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 401
    InvalidCredentials,
    /// HTTP 403
    InvalidToken,
    /// HTTP 429
    RateLimited,
    /// TLS certificate validation failed
    Tls,
    /// Connection failure or timeout
    Timeout,
    /// Anything else; the message is passed through
    Remote,
}

impl ErrorKind {
    /// Fixed user-facing message for this kind, if it has one.
    pub fn message(self, messages: &ErrorMessages) -> Option<&str> {
        match self {
            ErrorKind::InvalidCredentials => Some(&messages.invalid_credentials),
            ErrorKind::InvalidToken => Some(&messages.invalid_token),
            ErrorKind::RateLimited => Some(&messages.rate_limited),
            ErrorKind::Tls => Some(&messages.ssl_error),
            ErrorKind::Timeout => Some(&messages.time_out),
            ErrorKind::Remote => None,
        }
    }
}

/// Status codes that map to a fixed message instead of the response body.
pub type StatusTable = [(StatusCode, ErrorKind)];

/// Statuses the feed answers with for auth and throttling failures.
pub const STATUS_TABLE: &StatusTable = &[
    (StatusCode::UNAUTHORIZED, ErrorKind::InvalidCredentials),
    (StatusCode::TOO_MANY_REQUESTS, ErrorKind::RateLimited),
    (StatusCode::FORBIDDEN, ErrorKind::InvalidToken),
];

/// Look up the kind for a non-ok status.
pub fn status_kind(table: &StatusTable, status: StatusCode) -> ErrorKind {
    table
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Remote)
}

/// Translate a non-ok response into a user-facing error.
///
/// Listed statuses get their fixed message; anything else passes the raw
/// response text through.
pub fn translate_status(
    table: &StatusTable,
    messages: &ErrorMessages,
    status: StatusCode,
    body: &str,
) -> RemoteError {
    let kind = status_kind(table, status);
    let message = kind
        .message(messages)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());
    RemoteError::new(kind, message).with_status(status)
}

/// Translate a transport failure into a user-facing error.
pub fn translate_transport(messages: &ErrorMessages, err: reqwest::Error) -> RemoteError {
    let kind = transport_kind(&err);
    let message = kind
        .message(messages)
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());
    RemoteError::new(kind, message).with_source(err)
}

/// Classify a transport failure.
///
/// TLS failures surface as connect errors too, so the certificate check
/// has to run first.
pub fn transport_kind(err: &reqwest::Error) -> ErrorKind {
    if is_certificate_error(err) {
        ErrorKind::Tls
    } else if err.is_connect() || err.is_timeout() {
        ErrorKind::Timeout
    } else {
        ErrorKind::Remote
    }
}

/// Only the cause chain is inspected; the top-level message embeds the URL.
fn is_certificate_error(err: &reqwest::Error) -> bool {
    use std::error::Error as _;

    let mut current = err.source();
    while let Some(e) = current {
        let text = e.to_string().to_ascii_lowercase();
        if text.contains("certificate") {
            return true;
        }
        current = e.source();
    }
    false
}

/// User-facing error returned by every connector operation.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct RemoteError {
    kind: ErrorKind,
    status: Option<StatusCode>,
    message: String,
    #[source]
    source: Option<Cause>,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Passthrough error carrying a raw message.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Remote, message)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source(mut self, source: impl Into<Cause>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AppError> for RemoteError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Remote(remote) => remote,
            other => RemoteError::remote(other.to_string()).with_source(other),
        }
    }
}
