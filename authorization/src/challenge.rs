//! Challenge construction: the exact text a viewer signs to authorize a reveal.

use datafutures_types::{SessionKey, Timestamp};
use serde::{Deserialize, Serialize};

use crate::{AuthorizationError, AuthorizationWindow};

const PUBLIC_KEY: &str = "publickey";
const CONTRACT_ADDRESSES: &str = "contractAddresses";
const CHAIN_ID: &str = "contractsChainId";
const START_TIMESTAMP: &str = "startTimestamp";
const DURATION_DAYS: &str = "durationDays";

/// The five inputs of a challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeParams {
    /// Session token binding the signature to one client session.
    pub public_key: SessionKey,
    /// Store instance the authorization is scoped to.
    pub contract_address: String,
    pub chain_id: u64,
    pub start_timestamp: Timestamp,
    pub duration_days: u64,
}

impl ChallengeParams {
    pub fn window(&self) -> AuthorizationWindow {
        AuthorizationWindow::new(self.start_timestamp, self.duration_days)
    }
}

/// Builds and parses challenge messages. Pure: no store or network access.
pub struct ChallengeBuilder;

impl ChallengeBuilder {
    /// Render the five-line challenge. Identical inputs give byte-identical
    /// output.
    pub fn build(&self, params: &ChallengeParams) -> String {
        format!(
            "{PUBLIC_KEY}:{}\n{CONTRACT_ADDRESSES}:{}\n{CHAIN_ID}:{}\n{START_TIMESTAMP}:{}\n{DURATION_DAYS}:{}",
            params.public_key.as_str(),
            params.contract_address,
            params.chain_id,
            params.start_timestamp.as_secs(),
            params.duration_days,
        )
    }

    /// Recover the parameters from a challenge, for verifiers that receive
    /// only the signed text. Lines must appear in the built order.
    pub fn parse(&self, message: &str) -> Result<ChallengeParams, AuthorizationError> {
        let mut lines = message.split('\n');
        let mut field = |label: &str| -> Result<String, AuthorizationError> {
            let line = lines.next().ok_or_else(|| {
                AuthorizationError::MalformedChallenge(format!("missing {label}"))
            })?;
            line.strip_prefix(label)
                .and_then(|rest| rest.strip_prefix(':'))
                .map(str::to_string)
                .ok_or_else(|| AuthorizationError::MalformedChallenge(format!("expected {label}")))
        };

        let public_key = SessionKey::parse(&field(PUBLIC_KEY)?)
            .map_err(|e| AuthorizationError::MalformedChallenge(e.to_string()))?;
        let contract_address = field(CONTRACT_ADDRESSES)?;
        let chain_id = parse_number(CHAIN_ID, &field(CHAIN_ID)?)?;
        let start = parse_number(START_TIMESTAMP, &field(START_TIMESTAMP)?)?;
        let duration_days = parse_number(DURATION_DAYS, &field(DURATION_DAYS)?)?;

        if lines.next().is_some() {
            return Err(AuthorizationError::MalformedChallenge(
                "trailing lines".into(),
            ));
        }
        Ok(ChallengeParams {
            public_key,
            contract_address,
            chain_id,
            start_timestamp: Timestamp::new(start),
            duration_days,
        })
    }
}

fn parse_number(label: &str, raw: &str) -> Result<u64, AuthorizationError> {
    raw.parse()
        .map_err(|_| AuthorizationError::MalformedChallenge(format!("{label} is not a number")))
}
