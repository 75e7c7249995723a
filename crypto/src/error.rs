use thiserror::Error;

/// A value could not be turned into a token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("value is not a finite number")]
    NonFinite,

    #[error("encryption failed: {0}")]
    Cipher(String),
}

/// A token could not be turned back into a value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token is empty")]
    Empty,

    #[error("invalid base64 payload: {0}")]
    Base64(String),

    #[error("payload is not valid UTF-8")]
    Utf8,

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("decoded value is not finite")]
    NonFinite,

    #[error("sealed payload is truncated ({0} bytes)")]
    Truncated(usize),

    #[error("decryption failed: authentication check failed")]
    Authentication,
}

/// Key material in configuration or on the command line is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("not a valid Ed25519 public key")]
    InvalidPublicKey,

    #[error("codec secret must not be empty")]
    EmptySecret,
}
