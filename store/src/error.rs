use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store is unavailable: {0}")]
    Unavailable(String),

    #[error("write rejected for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}
