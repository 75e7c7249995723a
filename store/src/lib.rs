//! Abstract storage traits for data futures.
//!
//! The remote store is a flat key → bytes map with no multi-key
//! transactions. Every backend (LMDB, in-memory for testing, a remote
//! contract) implements these traits; the rest of the codebase depends only
//! on the traits.

pub mod error;
pub mod record;
pub mod scan;

pub use error::StoreError;
pub use record::RecordStore;
pub use scan::KeyScan;
