//! Operation entry points for the connector.
//!
//! - `fetch_indicators`: Fetch the blacklist and return or forward indicators
//! - `check_health`: Confirm the feed server answers

pub mod context;
pub mod fetch;
pub mod health;
pub mod registry;

pub use context::OperationContext;
pub use fetch::fetch_indicators;
pub use health::check_health;
pub use registry::{Operation, execute};
