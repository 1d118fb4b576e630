//! Error types for the CLI wallet.

use std::time::Duration;
use thiserror::Error;
use wallet_core::{CoreError, Signature};

/// Errors that can occur in the CLI wallet. Every variant is terminal for
/// the operation that produced it.
#[derive(Error, Debug)]
pub enum WalletError {
    /// Error when reading or writing the wallet file fails.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when the wallet file is missing or fails validation.
    #[error("Corrupt wallet: {0}")]
    CorruptWallet(String),

    /// Error when a destination address is malformed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Error when an amount is malformed or out of range.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Error when the endpoint cannot be reached or answers with garbage.
    #[error("Network error: {0}")]
    Network(String),

    /// Error when the node rejects a request.
    #[error("Node request failed ({code}): {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Message reported by the node
        message: String,
    },

    /// Error when a transaction's fate was not observed within the wait
    /// budget. It may still land later.
    #[error("Transaction {signature} was not confirmed within {waited:?}; its outcome is unknown")]
    ConfirmationTimeout {
        /// The transaction being watched
        signature: Signature,
        /// How long the client waited
        waited: Duration,
    },

    /// Error when a transaction was processed but failed on chain.
    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed {
        /// The failed transaction
        signature: Signature,
        /// Reason reported by the network
        reason: String,
    },

    /// Error when the endpoint does not support the requested operation.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl From<CoreError> for WalletError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidAddress { .. } => WalletError::InvalidAddress(error.to_string()),
            CoreError::InvalidAmount { .. } => WalletError::InvalidAmount(error.to_string()),
            CoreError::InvalidKey(msg) | CoreError::Signing(msg) => WalletError::CorruptWallet(msg),
            CoreError::InvalidSignature(msg) | CoreError::Encode(msg) | CoreError::Decode(msg) => {
                WalletError::Network(msg)
            }
        }
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(error: reqwest::Error) -> Self {
        WalletError::Network(error.to_string())
    }
}
