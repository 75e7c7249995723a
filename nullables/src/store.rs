//! Nullable store: thread-safe in-memory record store for testing.

use async_trait::async_trait;
use datafutures_store::{KeyScan, RecordStore, StoreError};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// An in-memory key → bytes map with switches for the failure modes a
/// remote store exhibits: unavailability, rejected writes, failed reads.
///
/// With yielding enabled every operation suspends once before touching the
/// map, so operations joined on one task interleave deterministically.
pub struct NullStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
    available: AtomicBool,
    fail_reads: AtomicBool,
    fail_all_writes: AtomicBool,
    failing_keys: Mutex<HashSet<String>>,
    failing_read_keys: Mutex<HashSet<String>>,
    yielding: AtomicBool,
    gets: AtomicU64,
    sets: AtomicU64,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            available: AtomicBool::new(true),
            fail_reads: AtomicBool::new(false),
            fail_all_writes: AtomicBool::new(false),
            failing_keys: Mutex::new(HashSet::new()),
            failing_read_keys: Mutex::new(HashSet::new()),
            yielding: AtomicBool::new(false),
            gets: AtomicU64::new(0),
            sets: AtomicU64::new(0),
        }
    }

    /// Toggle what `is_available` reports.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make every `get` fail with a backend error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `set` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_all_writes.store(fail, Ordering::SeqCst);
    }

    /// Reject writes to one key.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }

    /// Fail `get` for one key. Key scans are unaffected.
    pub fn fail_reads_from(&self, key: &str) {
        self.failing_read_keys.lock().unwrap().insert(key.to_string());
    }

    /// Serve reads for keys previously set to fail.
    pub fn clear_read_failures(&self) {
        self.failing_read_keys.lock().unwrap().clear();
        self.fail_reads.store(false, Ordering::SeqCst);
    }

    /// Accept writes to a key previously set to fail.
    pub fn clear_write_failures(&self) {
        self.failing_keys.lock().unwrap().clear();
        self.fail_all_writes.store(false, Ordering::SeqCst);
    }

    /// Suspend once per operation.
    pub fn set_yielding(&self, yielding: bool) {
        self.yielding.store(yielding, Ordering::SeqCst);
    }

    /// Seed or overwrite a value without going through the trait.
    pub fn put_raw(&self, key: &str, value: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
    }

    /// Current value under `key`, empty if absent.
    pub fn get_raw(&self, key: &str) -> Vec<u8> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn remove_raw(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    /// Number of `get` calls served (including failed ones).
    pub fn get_count(&self) -> u64 {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `set` calls received (including rejected ones).
    pub fn set_count(&self) -> u64 {
        self.sets.load(Ordering::SeqCst)
    }

    async fn maybe_yield(&self) {
        if self.yielding.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for NullStore {
    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.maybe_yield().await;
        self.gets.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null store switched off".into()));
        }
        if self.fail_reads.load(Ordering::SeqCst)
            || self.failing_read_keys.lock().unwrap().contains(key)
        {
            return Err(StoreError::Backend(format!("injected read failure for {key}")));
        }
        Ok(self.get_raw(key))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.maybe_yield().await;
        self.sets.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null store switched off".into()));
        }
        if self.fail_all_writes.load(Ordering::SeqCst)
            || self.failing_keys.lock().unwrap().contains(key)
        {
            return Err(StoreError::WriteRejected {
                key: key.to_string(),
                reason: "injected write failure".into(),
            });
        }
        self.put_raw(key, value);
        Ok(())
    }
}

#[async_trait]
impl KeyScan for NullStore {
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.maybe_yield().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected scan failure".into()));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, v)| k.starts_with(prefix) && !v.is_empty())
            .map(|(k, _)| k.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_key_reads_empty() {
        let store = NullStore::new();
        assert!(store.get("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = NullStore::new();
        store.set("k", b"v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), b"v");
        assert_eq!(store.get_count(), 1);
        assert_eq!(store.set_count(), 1);
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = NullStore::new();
        store.fail_writes_to("bad");
        assert!(matches!(
            store.set("bad", b"x").await,
            Err(StoreError::WriteRejected { .. })
        ));
        store.set("good", b"x").await.unwrap();

        store.fail_reads(true);
        assert!(matches!(store.get("good").await, Err(StoreError::Backend(_))));
        store.fail_reads(false);

        store.set_available(false);
        assert!(!store.is_available().await);
        assert!(matches!(store.get("good").await, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn per_key_read_failure_leaves_scans_working() {
        let store = NullStore::new();
        store.put_raw("future_keys", br#"["a"]"#);
        store.put_raw("future_a", b"1");
        store.fail_reads_from("future_keys");

        assert!(matches!(store.get("future_keys").await, Err(StoreError::Backend(_))));
        assert_eq!(store.get("future_a").await.unwrap(), b"1");
        assert_eq!(store.keys_with_prefix("future_").await.unwrap().len(), 2);

        store.clear_read_failures();
        assert_eq!(store.get("future_keys").await.unwrap(), br#"["a"]"#);
    }

    #[tokio::test]
    async fn prefix_scan_skips_empty_values() {
        let store = NullStore::new();
        store.put_raw("future_a", b"1");
        store.put_raw("future_b", b"");
        store.put_raw("other", b"1");
        assert_eq!(store.keys_with_prefix("future_").await.unwrap(), vec!["future_a"]);
    }
}
