//! Future records and their identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Category, OwnerAddress, Timestamp, TypesError};

/// Globally unique identifier of a future.
///
/// Generated ids have the form `future-<unix secs>-<uuid v4 simple>`; the
/// random 128-bit suffix carries the uniqueness guarantee.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FutureId(String);

impl FutureId {
    pub const PREFIX: &'static str = "future-";

    /// Wrap an existing id read from the index.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse a caller-supplied id, rejecting blank input.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyFutureId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Mint a fresh id for a future created at `now`.
    pub fn generate(now: Timestamp) -> Self {
        Self(format!(
            "{}{}-{}",
            Self::PREFIX,
            now.as_secs(),
            uuid::Uuid::new_v4().simple()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FutureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A published data future: a description of a future observation plus
/// its encrypted value.
///
/// Records are created once and never updated or deleted. Expiry is a
/// read-time classification (see [`FutureRecord::is_active`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FutureRecord {
    pub id: FutureId,
    /// Opaque token produced by a value codec.
    pub encrypted_value: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub owner: OwnerAddress,
    pub description: String,
    pub category: Category,
}

impl FutureRecord {
    /// A future is active strictly before its expiry instant.
    pub fn is_active(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }

    /// Requested lifetime in seconds.
    pub fn lifetime_secs(&self) -> u64 {
        self.expires_at.as_secs().saturating_sub(self.created_at.as_secs())
    }
}
