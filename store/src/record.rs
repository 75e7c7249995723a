//! Record store adapter trait.

use async_trait::async_trait;
use std::sync::Arc;

use crate::StoreError;

/// A remote key → bytes map with two data operations.
///
/// Absence is signalled by an empty value, not an error: `get` on a key that
/// was never written returns `Ok(vec![])`. Calls may suspend on a remote
/// round trip; timeouts are the implementation's responsibility.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether the store is ready to serve requests.
    async fn is_available(&self) -> bool;

    /// Read the value under `key`; empty bytes mean the key is absent.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Overwrite the value under `key`.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn is_available(&self) -> bool {
        (**self).is_available().await
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }
}
