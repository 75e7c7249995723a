//! Index reconciliation for stores that can enumerate keys.
//!
//! A record whose index append failed is durable but invisible to listings.
//! Diffing the `future_*` record keys against the index finds such records
//! (and the reverse case, index entries with no record).

use std::collections::HashSet;

use datafutures_store::KeyScan;
use datafutures_types::FutureId;

use crate::keys::{id_from_record_key, RECORD_PREFIX};
use crate::{IndexError, IndexManager};

/// Differences between the index and the records present in the store.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Records present in the store but missing from the index.
    pub unindexed: Vec<FutureId>,
    /// Index entries with no record behind them.
    pub dangling: Vec<FutureId>,
}

impl Reconciliation {
    pub fn is_consistent(&self) -> bool {
        self.unindexed.is_empty() && self.dangling.is_empty()
    }
}

impl<S: KeyScan> IndexManager<S> {
    /// Compare the index with the record keys present in the store.
    ///
    /// Fails only if the store cannot be scanned or read; an unparseable
    /// index counts as empty, so every record shows up as unindexed.
    pub async fn reconcile(&self) -> Result<Reconciliation, IndexError> {
        let indexed = match self.read_index().await {
            Ok(ids) => ids,
            Err(IndexError::Parse { key, reason }) => {
                tracing::warn!(%key, %reason, "unparseable index reconciled as empty");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let indexed_set: HashSet<&FutureId> = indexed.iter().collect();

        let present: Vec<FutureId> = self
            .store()
            .keys_with_prefix(RECORD_PREFIX)
            .await?
            .iter()
            .filter_map(|key| id_from_record_key(key))
            .collect();
        let present_set: HashSet<&FutureId> = present.iter().collect();

        let unindexed: Vec<FutureId> = present
            .iter()
            .filter(|id| !indexed_set.contains(id))
            .cloned()
            .collect();

        let mut seen = HashSet::new();
        let dangling: Vec<FutureId> = indexed
            .iter()
            .filter(|id| !present_set.contains(id) && seen.insert(*id))
            .cloned()
            .collect();

        if !unindexed.is_empty() || !dangling.is_empty() {
            tracing::info!(
                unindexed = unindexed.len(),
                dangling = dangling.len(),
                "index inconsistent with stored records"
            );
        }
        Ok(Reconciliation {
            unindexed,
            dangling,
        })
    }

    /// Append every unindexed record to the index. Returns how many ids
    /// were appended. Dangling entries are left alone; listings skip them.
    pub async fn repair(&self) -> Result<usize, IndexError> {
        let report = self.reconcile().await?;
        for id in &report.unindexed {
            self.append_id(id).await?;
        }
        if !report.unindexed.is_empty() {
            tracing::info!(repaired = report.unindexed.len(), "unindexed records appended");
        }
        Ok(report.unindexed.len())
    }
}
