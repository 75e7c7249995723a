//! Store key layout.

use datafutures_types::FutureId;

/// Well-known key holding the ordered id list.
pub const INDEX_KEY: &str = "future_keys";

/// Prefix of every per-future record key.
pub const RECORD_PREFIX: &str = "future_";

/// Store key of the record for `id`.
pub fn record_key(id: &FutureId) -> String {
    format!("{RECORD_PREFIX}{}", id.as_str())
}

/// Recover the id from a record key. The index key shares the record
/// prefix and is not a record.
pub fn id_from_record_key(key: &str) -> Option<FutureId> {
    if key == INDEX_KEY {
        return None;
    }
    key.strip_prefix(RECORD_PREFIX)
        .filter(|id| !id.is_empty())
        .map(FutureId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_round_trip() {
        let id = FutureId::new("future-1700000000-ab12");
        let key = record_key(&id);
        assert_eq!(key, "future_future-1700000000-ab12");
        assert_eq!(id_from_record_key(&key), Some(id));
    }

    #[test]
    fn index_key_is_not_a_record() {
        assert_eq!(id_from_record_key(INDEX_KEY), None);
        assert_eq!(id_from_record_key("future_"), None);
        assert_eq!(id_from_record_key("other_key"), None);
    }
}
