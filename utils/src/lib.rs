//! Shared utilities for data futures.

pub mod logging;
pub mod stats;
pub mod time;

pub use logging::{init_logging, init_tracing, LogFormat};
pub use stats::StatsCounter;
pub use time::{describe_expiry, format_duration};
