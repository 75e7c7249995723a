use datafutures_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("unparseable payload under {key}: {reason}")]
    Parse { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("index append for {id} lost to concurrent writers after {attempts} attempts")]
    AppendLost { id: String, attempts: u32 },
}
