//! Future service.
//!
//! Orchestrates the index, the value codec and reveal authorization:
//! - `list` / `get`: read futures, tolerating a drifting index
//! - `create`: encode, write the record, then append its id to the index
//! - `reveal`: obtain a signature over the session challenge, then decode

pub mod config;
pub mod error;
pub mod service;
pub mod summary;

pub use config::{CodecKind, ServiceConfig};
pub use error::{CreationError, RevealError, ServiceError};
pub use service::{counters, FutureService, NewFuture};
pub use summary::FutureSummary;
