//! Stored document formats.
//!
//! Records are UTF-8 JSON objects with the field names existing clients
//! write (`value`, `timestamp`, `owner`, `description`, `category`,
//! `expiryDate`); the index is a bare JSON array of id strings.

use serde::{Deserialize, Serialize};

use datafutures_types::{Category, FutureId, FutureRecord, OwnerAddress, Timestamp};

use crate::IndexError;

/// On-store shape of one future.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredFuture {
    /// Codec token for the value.
    pub value: String,
    /// Creation time, Unix seconds.
    #[serde(deserialize_with = "whole_secs::deserialize")]
    pub timestamp: Timestamp,
    #[serde(default)]
    pub owner: OwnerAddress,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    /// Expiry time; older documents omit it or write `0`.
    #[serde(
        rename = "expiryDate",
        default,
        deserialize_with = "whole_secs::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<Timestamp>,
}

impl StoredFuture {
    pub fn from_record(record: &FutureRecord) -> Self {
        Self {
            value: record.encrypted_value.clone(),
            timestamp: record.created_at,
            owner: record.owner.clone(),
            description: record.description.clone(),
            category: record.category,
            expiry_date: Some(record.expires_at),
        }
    }

    /// Attach the id and fill the expiry default
    /// (`timestamp + default_expiry_days`). A zero expiry counts as missing.
    pub fn into_record(self, id: FutureId, default_expiry_days: u64) -> FutureRecord {
        let expires_at = self
            .expiry_date
            .filter(|t| t.as_secs() > 0)
            .unwrap_or_else(|| self.timestamp.plus_days(default_expiry_days));
        FutureRecord {
            id,
            encrypted_value: self.value,
            created_at: self.timestamp,
            expires_at,
            owner: self.owner,
            description: self.description,
            category: self.category,
        }
    }
}

/// Unix seconds as JSON clients write them: an integer, or a float with no
/// fractional part such as `1000.0`.
mod whole_secs {
    use std::fmt;

    use datafutures_types::Timestamp;
    use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};

    struct WholeSecs(Timestamp);

    struct WholeSecsVisitor;

    impl Visitor<'_> for WholeSecsVisitor {
        type Value = WholeSecs;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative whole number of seconds")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<WholeSecs, E> {
            Ok(WholeSecs(Timestamp::new(v)))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<WholeSecs, E> {
            u64::try_from(v)
                .map(|secs| WholeSecs(Timestamp::new(secs)))
                .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<WholeSecs, E> {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 {
                Ok(WholeSecs(Timestamp::new(v as u64)))
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }
    }

    impl<'de> Deserialize<'de> for WholeSecs {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_any(WholeSecsVisitor)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Timestamp, D::Error> {
        WholeSecs::deserialize(d).map(|w| w.0)
    }

    pub fn option<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Timestamp>, D::Error> {
        Option::<WholeSecs>::deserialize(d).map(|w| w.map(|w| w.0))
    }
}

pub fn encode_record(record: &FutureRecord) -> Result<Vec<u8>, IndexError> {
    serde_json::to_vec(&StoredFuture::from_record(record))
        .map_err(|e| IndexError::Serialization(e.to_string()))
}

pub fn decode_record(
    key: &str,
    id: FutureId,
    bytes: &[u8],
    default_expiry_days: u64,
) -> Result<FutureRecord, IndexError> {
    let text = std::str::from_utf8(bytes).map_err(|e| IndexError::Parse {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    let stored: StoredFuture = serde_json::from_str(text).map_err(|e| IndexError::Parse {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    Ok(stored.into_record(id, default_expiry_days))
}

pub fn encode_index(ids: &[FutureId]) -> Result<Vec<u8>, IndexError> {
    serde_json::to_vec(ids).map_err(|e| IndexError::Serialization(e.to_string()))
}

/// Decode the id list. An empty or whitespace-only payload is an empty index.
pub fn decode_index(key: &str, bytes: &[u8]) -> Result<Vec<FutureId>, IndexError> {
    let text = std::str::from_utf8(bytes).map_err(|e| IndexError::Parse {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(|e| IndexError::Parse {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
