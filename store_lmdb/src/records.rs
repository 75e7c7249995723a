//! LMDB implementation of the record store.
//!
//! Keys are stored as their UTF-8 bytes, so a byte-range scan over
//! `[prefix, prefix+1)` enumerates every key starting with `prefix`.
//! LMDB calls are short and synchronous; they run inline on the caller's task.

use std::ops::Bound;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use heed::types::Bytes;
use heed::{Database, Env};

use datafutures_store::{KeyScan, RecordStore, StoreError};

use crate::environment::DEFAULT_MAP_SIZE;
use crate::{LmdbEnvironment, LmdbError};

const RECORDS_DB: &str = "records";

pub struct LmdbRecordStore {
    env: Arc<Env>,
    records_db: Database<Bytes, Bytes>,
}

impl LmdbRecordStore {
    /// Open (or create) the store under `dir`.
    pub fn open(dir: &Path) -> Result<Self, LmdbError> {
        let environment = LmdbEnvironment::open(dir, 1, DEFAULT_MAP_SIZE)?;
        Self::with_environment(&environment)
    }

    pub fn with_environment(environment: &LmdbEnvironment) -> Result<Self, LmdbError> {
        let env = environment.env();
        let mut wtxn = env.write_txn()?;
        let records_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(RECORDS_DB))?;
        wtxn.commit()?;
        Ok(Self { env, records_db })
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let val = self.records_db.get(&rtxn, key.as_bytes())?;
        Ok(val.map(<[u8]>::to_vec).unwrap_or_default())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        if value.is_empty() {
            self.records_db.delete(&mut wtxn, key.as_bytes())?;
        } else {
            self.records_db.put(&mut wtxn, key.as_bytes(), value)?;
        }
        wtxn.commit()?;
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<String>, LmdbError> {
        let lower = prefix.as_bytes();
        let upper = prefix_upper_bound(lower);
        let bounds = (
            Bound::Included(lower),
            match upper.as_deref() {
                Some(upper) => Bound::Excluded(upper),
                None => Bound::Unbounded,
            },
        );

        let rtxn = self.env.read_txn()?;
        let mut keys = Vec::new();
        for result in self.records_db.range(&rtxn, &bounds)? {
            let (key, val) = result?;
            if val.is_empty() {
                continue;
            }
            match std::str::from_utf8(key) {
                Ok(key) => keys.push(key.to_string()),
                Err(_) => tracing::warn!(key = ?key, "skipping non-UTF-8 key"),
            }
        }
        Ok(keys)
    }
}

/// Smallest byte string greater than every string starting with `prefix`,
/// or `None` if no such bound exists (empty or all-`0xFF` prefix).
fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut upper = prefix.to_vec();
    while let Some(last) = upper.pop() {
        if last < u8::MAX {
            upper.push(last + 1);
            return Some(upper);
        }
    }
    None
}

#[async_trait]
impl RecordStore for LmdbRecordStore {
    async fn is_available(&self) -> bool {
        true
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let bytes = self.read(key)?;
        tracing::trace!(key, len = bytes.len(), "lmdb get");
        Ok(bytes)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.write(key, value).map_err(|e| StoreError::WriteRejected {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        tracing::trace!(key, len = value.len(), "lmdb set");
        Ok(())
    }
}

#[async_trait]
impl KeyScan for LmdbRecordStore {
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.scan(prefix)?)
    }
}
