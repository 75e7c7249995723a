//! LMDB storage backend for data futures.
//!
//! Implements [`RecordStore`](datafutures_store::RecordStore) and
//! [`KeyScan`](datafutures_store::KeyScan) using the `heed` LMDB bindings.
//! All keys live in one named database inside a single environment.

pub mod environment;
pub mod error;
pub mod records;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use records::LmdbRecordStore;
