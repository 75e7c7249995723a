//! Index manager: list / append / read / write over the two-level layout.

use datafutures_store::RecordStore;
use datafutures_types::{FutureId, FutureRecord};

use crate::document::{decode_index, decode_record, encode_index, encode_record};
use crate::keys::{record_key, INDEX_KEY};
use crate::IndexError;

/// Tunables for index maintenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexOptions {
    /// Lifetime assumed for stored records that carry no `expiryDate`.
    pub default_expiry_days: u64,
    /// Read-modify-write rounds an append may take before giving up.
    pub append_attempts: u32,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            default_expiry_days: 30,
            append_attempts: 3,
        }
    }
}

/// A non-fatal problem met while reading the index or its records.
#[derive(Debug)]
pub enum ListIssue {
    /// The index payload could not be read or parsed; it was treated as empty.
    Index(IndexError),
    /// An index entry has no record behind it.
    Dangling(FutureId),
    /// A record exists but could not be read or parsed.
    Record { id: FutureId, error: IndexError },
}

/// Result of a full listing: surviving records newest first, plus every
/// entry that was skipped.
#[derive(Debug, Default)]
pub struct Listing {
    pub records: Vec<FutureRecord>,
    pub issues: Vec<ListIssue>,
}

/// Maintains the id list and the per-id records in one flat store.
pub struct IndexManager<S> {
    store: S,
    options: IndexOptions,
}

impl<S: RecordStore> IndexManager<S> {
    pub fn new(store: S, options: IndexOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> IndexOptions {
        self.options
    }

    /// Read the index, distinguishing store failures from bad payloads.
    pub(crate) async fn read_index(&self) -> Result<Vec<FutureId>, IndexError> {
        let bytes = self.store.get(INDEX_KEY).await?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        decode_index(INDEX_KEY, &bytes)
    }

    /// The ordered id list. Absent, unreadable or unparseable payloads yield
    /// an empty list together with the problem.
    pub async fn list_ids(&self) -> (Vec<FutureId>, Option<IndexError>) {
        match self.read_index().await {
            Ok(ids) => (ids, None),
            Err(e) => {
                tracing::warn!(key = INDEX_KEY, error = %e, "index unreadable, treating as empty");
                (Vec::new(), Some(e))
            }
        }
    }

    /// Append `id` to the index by read-modify-write of the whole list.
    ///
    /// This is not compare-and-swap. After each write the list is read back;
    /// if another writer replaced it in between and `id` is gone, the round
    /// is repeated up to `append_attempts` times. A concurrent append can
    /// still be lost when the other writer does not check. Duplicates are
    /// not checked: appending an id already present adds a second entry.
    pub async fn append_id(&self, id: &FutureId) -> Result<(), IndexError> {
        let attempts = self.options.append_attempts.max(1);
        for attempt in 1..=attempts {
            let mut ids = match self.read_index().await {
                Ok(ids) => ids,
                Err(IndexError::Parse { key, reason }) => {
                    tracing::warn!(%key, %reason, "unparseable index replaced on append");
                    Vec::new()
                }
                Err(e) => return Err(e),
            };
            ids.push(id.clone());
            self.store.set(INDEX_KEY, &encode_index(&ids)?).await?;

            match self.read_index().await {
                Ok(current) if current.contains(id) => {
                    tracing::debug!(%id, attempt, "index append confirmed");
                    return Ok(());
                }
                Ok(_) | Err(IndexError::Parse { .. }) => {
                    tracing::warn!(%id, attempt, "index append overwritten by a concurrent writer");
                }
                Err(e) => {
                    // The write itself went through; only confirmation failed.
                    tracing::debug!(%id, error = %e, "index append unconfirmed");
                    return Ok(());
                }
            }
        }
        Err(IndexError::AppendLost {
            id: id.to_string(),
            attempts,
        })
    }

    /// Read one record. `Ok(None)` when the key is absent.
    pub async fn try_read_record(&self, id: &FutureId) -> Result<Option<FutureRecord>, IndexError> {
        let key = record_key(id);
        let bytes = self.store.get(&key).await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        decode_record(&key, id.clone(), &bytes, self.options.default_expiry_days).map(Some)
    }

    /// Read one record, logging and absorbing any failure.
    pub async fn read_record(&self, id: &FutureId) -> Option<FutureRecord> {
        match self.try_read_record(id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(%id, error = %e, "record unreadable");
                None
            }
        }
    }

    /// Serialize and write the record under its own key.
    pub async fn write_record(&self, record: &FutureRecord) -> Result<(), IndexError> {
        let key = record_key(&record.id);
        let bytes = encode_record(record)?;
        self.store.set(&key, &bytes).await?;
        tracing::debug!(%key, bytes = bytes.len(), "record written");
        Ok(())
    }

    /// Every readable record, newest `created_at` first; ties keep index
    /// order. An id indexed twice is listed twice.
    pub async fn list_all(&self) -> Listing {
        let (ids, index_issue) = self.list_ids().await;
        let mut listing = Listing::default();
        listing.issues.extend(index_issue.map(ListIssue::Index));

        for id in ids {
            match self.try_read_record(&id).await {
                Ok(Some(record)) => listing.records.push(record),
                Ok(None) => {
                    tracing::debug!(%id, "index entry without record, skipping");
                    listing.issues.push(ListIssue::Dangling(id));
                }
                Err(error) => {
                    tracing::warn!(%id, %error, "skipping unreadable record");
                    listing.issues.push(ListIssue::Record { id, error });
                }
            }
        }

        // `sort_by` is stable, so equal timestamps keep index order.
        listing
            .records
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listing
    }
}
