//! Utility functions and helpers.

pub mod http;
pub mod url;

pub use self::url::{endpoint, normalize_server_url};
