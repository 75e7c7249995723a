//! Dashboard counts over a listing.

use std::collections::BTreeMap;

use datafutures_types::{Category, FutureRecord, Timestamp};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FutureSummary {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    /// Every category appears, including those with no futures.
    pub by_category: BTreeMap<Category, usize>,
}

impl FutureSummary {
    pub fn from_records(records: &[FutureRecord], now: Timestamp) -> Self {
        let mut by_category: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|&c| (c, 0)).collect();
        let mut active = 0;
        for record in records {
            if record.is_active(now) {
                active += 1;
            }
            *by_category.entry(record.category).or_insert(0) += 1;
        }
        Self {
            total: records.len(),
            active,
            expired: records.len() - active,
            by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafutures_types::{FutureId, OwnerAddress};

    fn record(id: &str, category: Category, expires_at: u64) -> FutureRecord {
        FutureRecord {
            id: FutureId::new(id),
            encrypted_value: "FHE-MQ==".into(),
            created_at: Timestamp::new(0),
            expires_at: Timestamp::new(expires_at),
            owner: OwnerAddress::new("0xABC"),
            description: String::new(),
            category,
        }
    }

    #[test]
    fn empty_listing() {
        let s = FutureSummary::from_records(&[], Timestamp::new(10));
        assert_eq!(s.total, 0);
        assert_eq!(s.active, 0);
        assert_eq!(s.by_category.len(), Category::ALL.len());
        assert!(s.by_category.values().all(|&n| n == 0));
    }

    #[test]
    fn expiry_boundary_counts_as_expired() {
        let records = vec![
            record("a", Category::Climate, 100),
            record("b", Category::Climate, 101),
            record("c", Category::Tech, 50),
        ];
        let s = FutureSummary::from_records(&records, Timestamp::new(100));
        assert_eq!(s.total, 3);
        assert_eq!(s.active, 1);
        assert_eq!(s.expired, 2);
        assert_eq!(s.by_category[&Category::Climate], 2);
        assert_eq!(s.by_category[&Category::Tech], 1);
        assert_eq!(s.by_category[&Category::Health], 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn counts_partition_the_listing(
                expiries in proptest::collection::vec(0u64..200, 0..40),
                now in 0u64..200,
            ) {
                let records: Vec<FutureRecord> = expiries
                    .iter()
                    .enumerate()
                    .map(|(i, e)| record(&i.to_string(), Category::ALL[i % 5], *e))
                    .collect();
                let s = FutureSummary::from_records(&records, Timestamp::new(now));
                prop_assert_eq!(s.active + s.expired, s.total);
                prop_assert_eq!(s.by_category.values().sum::<usize>(), s.total);
                prop_assert_eq!(s.active, expiries.iter().filter(|e| now < **e).count());
            }
        }
    }
}
