// src/services/mod.rs

//! Service layer: the feed client and indicator extraction.

pub mod feed;
pub mod indicators;

pub use feed::{FeedClient, IP_BLACKLIST_PATH};
pub use indicators::extract_indicators;
