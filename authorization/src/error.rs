use thiserror::Error;

use crate::state::RevealState;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthorizationError {
    #[error("authorization window has zero length")]
    EmptyWindow,

    #[error("authorization window starts at {start}, now is {now}")]
    NotYetValid { start: u64, now: u64 },

    #[error("authorization window ended at {end}, now is {now}")]
    Expired { end: u64, now: u64 },

    #[error("signature does not match the challenge")]
    BadSignature,

    #[error("signer {0} is not permitted")]
    UnknownSigner(String),

    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),

    #[error("invalid reveal transition from {from:?} via {event}")]
    InvalidTransition { from: RevealState, event: &'static str },
}

/// The signer capability did not produce a signature.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("user declined to sign")]
    Declined,

    #[error("signer unavailable: {0}")]
    Unavailable(String),
}
