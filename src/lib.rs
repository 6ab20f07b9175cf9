// src/lib.rs

//! Talos IP blacklist feed connector library

pub mod error;
pub mod ingest;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
