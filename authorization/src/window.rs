//! Validity window of an authorization.

use datafutures_types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::AuthorizationError;

/// `[start, start + duration_days * 86400]`, both ends inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationWindow {
    pub start: Timestamp,
    pub duration_days: u64,
}

impl AuthorizationWindow {
    pub fn new(start: Timestamp, duration_days: u64) -> Self {
        Self {
            start,
            duration_days,
        }
    }

    pub fn end(&self) -> Timestamp {
        self.start.plus_days(self.duration_days)
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        self.start <= t && t <= self.end()
    }

    /// Check that the window is non-empty and `now` lies inside it.
    pub fn validate(&self, now: Timestamp) -> Result<(), AuthorizationError> {
        if self.duration_days == 0 {
            return Err(AuthorizationError::EmptyWindow);
        }
        if now < self.start {
            return Err(AuthorizationError::NotYetValid {
                start: self.start.as_secs(),
                now: now.as_secs(),
            });
        }
        let end = self.end();
        if now > end {
            return Err(AuthorizationError::Expired {
                end: end.as_secs(),
                now: now.as_secs(),
            });
        }
        Ok(())
    }
}
