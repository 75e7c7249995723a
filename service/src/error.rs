use datafutures_authorization::AuthorizationError;
use datafutures_crypto::{DecodeError, EncodeError, KeyError};
use datafutures_index::IndexError;
use thiserror::Error;

/// Why a future could not be created.
#[derive(Debug, Error)]
pub enum CreationError {
    #[error("record store is unavailable")]
    StoreUnavailable,

    #[error("an owner address is required")]
    MissingOwner,

    #[error("value cannot be encoded: {0}")]
    Encode(#[from] EncodeError),

    /// The record write was rejected; nothing was appended to the index.
    #[error("record write failed: {0}")]
    WriteFailed(String),
}

/// Why a reveal did not produce a value.
#[derive(Debug, Error)]
pub enum RevealError {
    #[error("signature request declined")]
    UserDeclined,

    #[error("signer unavailable: {0}")]
    SignerUnavailable(String),

    #[error("authorization rejected: {0}")]
    Unauthorized(AuthorizationError),

    #[error("decryption failed: {0}")]
    DecodeFailed(#[from] DecodeError),

    /// The reveal flow was not in a state that allows this step.
    #[error("reveal flow: {0}")]
    Flow(AuthorizationError),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),

    #[error("codec key error: {0}")]
    CodecKey(#[from] KeyError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),
}
