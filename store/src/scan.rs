//! Optional key enumeration capability.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{RecordStore, StoreError};

/// Stores that can enumerate their keys by prefix.
///
/// Not every remote map offers this; it is only needed for reconciling the
/// index against the records actually present.
#[async_trait]
pub trait KeyScan: RecordStore {
    /// All keys starting with `prefix` that hold a non-empty value, in
    /// ascending byte order.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

#[async_trait]
impl<T: KeyScan + ?Sized> KeyScan for Arc<T> {
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        (**self).keys_with_prefix(prefix).await
    }
}
