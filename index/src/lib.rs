//! Future index over a flat key-value store.
//!
//! Two levels live side by side in the store:
//! - `future_keys`: one JSON array of ids, in insertion order
//! - `future_<id>`: one JSON document per future
//!
//! The store offers no multi-key transactions, so the two levels can drift
//! apart (a crash between the record write and the index append, or two
//! clients racing on the index). Reads tolerate that drift: dangling index
//! entries and unparseable payloads are skipped and reported, never fatal.

pub mod document;
pub mod error;
pub mod keys;
pub mod manager;
pub mod reconcile;

pub use document::StoredFuture;
pub use error::IndexError;
pub use keys::{id_from_record_key, record_key, INDEX_KEY, RECORD_PREFIX};
pub use manager::{IndexManager, IndexOptions, ListIssue, Listing};
pub use reconcile::Reconciliation;
