use thiserror::Error;

/// Errors raised when parsing or using key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid bech32 encoding: {0}")]
    Bech32(String),

    #[error("wrong key prefix: expected {expected}, found {found}")]
    WrongPrefix { expected: &'static str, found: String },

    #[error("key payload must be 32 bytes, got {0}")]
    BadLength(usize),

    #[error("key material is not a valid secret scalar")]
    InvalidSecretKey,

    #[error("key bytes are not a valid x-only curve point")]
    InvalidPublicKey,

    #[error("invalid public key format (expected npub1… or 64-char hex): {0}")]
    BadPublicKeyFormat(String),
}
