//! Errors raised while constructing domain values.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("owner address must not be empty")]
    EmptyOwner,

    #[error("future id must not be empty")]
    EmptyFutureId,

    #[error("invalid session key: {0}")]
    InvalidSessionKey(String),
}
