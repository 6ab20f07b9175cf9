// src/services/indicators.rs

//! Indicator extraction from the plaintext feed body.

use std::collections::HashSet;

/// Split the feed body into unique, non-empty indicators.
///
/// Lines are taken verbatim (no trimming). Order is not preserved.
pub fn extract_indicators(body: &str) -> Vec<String> {
    let unique: HashSet<&str> = body.split('\n').collect();
    unique
        .into_iter()
        .filter(|indicator| !indicator.is_empty())
        .map(str::to_string)
        .collect()
}
