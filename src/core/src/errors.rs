//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Error when a string is not a well-formed base58 address.
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Error when a whole-unit amount cannot be converted to lamports.
    #[error("Invalid amount {input:?}: {reason}")]
    InvalidAmount {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Error when keypair bytes are malformed or inconsistent.
    #[error("Invalid keypair: {0}")]
    InvalidKey(String),

    /// Error when a signature string or byte slice is malformed.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Error when signing fails, e.g. the key is not a required signer.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Error when a transaction cannot be serialized for the wire.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Error when wire bytes cannot be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl CoreError {
    pub(crate) fn invalid_address(input: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidAddress {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_amount(input: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
