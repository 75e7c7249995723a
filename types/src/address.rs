//! Owner identity of a future.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// The account that published a future (an account address or equivalent).
///
/// Stored records may carry an empty owner when the field was missing, so
/// construction from a raw string never fails; use [`OwnerAddress::parse`]
/// where a real identity is required.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerAddress(String);

impl OwnerAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse a caller-supplied identity, rejecting blank input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyOwner);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for OwnerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OwnerAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for OwnerAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
