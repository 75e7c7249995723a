//! Per-client authorization session.

use datafutures_types::{SessionKey, Timestamp};

use crate::{ChallengeBuilder, ChallengeParams};

/// Which store instance an authorization is scoped to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizationScope {
    pub contract_address: String,
    pub chain_id: u64,
}

/// Challenge parameters fixed once when a client session starts.
///
/// A fresh session key is drawn per session, so a signature captured in one
/// session does not authorize another.
#[derive(Clone, Debug)]
pub struct AuthorizationSession {
    params: ChallengeParams,
}

impl AuthorizationSession {
    /// Start a session at `now` with a newly generated session key.
    pub fn start(scope: AuthorizationScope, duration_days: u64, now: Timestamp) -> Self {
        Self::with_key(datafutures_crypto::generate_session_key(), scope, duration_days, now)
    }

    /// Start a session with a caller-supplied key (deterministic tests,
    /// restoring a persisted session).
    pub fn with_key(
        public_key: SessionKey,
        scope: AuthorizationScope,
        duration_days: u64,
        now: Timestamp,
    ) -> Self {
        Self {
            params: ChallengeParams {
                public_key,
                contract_address: scope.contract_address,
                chain_id: scope.chain_id,
                start_timestamp: now,
                duration_days,
            },
        }
    }

    pub fn params(&self) -> &ChallengeParams {
        &self.params
    }

    /// The message to sign for any reveal in this session.
    pub fn challenge(&self) -> String {
        ChallengeBuilder.build(&self.params)
    }
}
