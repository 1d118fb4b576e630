//! Core types for the devnet wallet.
//!
//! Addresses, signatures and blockhashes are the network's own types. This
//! module adds the unit constants and the text parsing that reports failures
//! as [`CoreError`].

use crate::errors::CoreError;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::str::FromStr;

pub use solana_sdk::native_token::LAMPORTS_PER_SOL;

/// Account balance or transfer amount in lamports, the network's base unit.
pub type Lamports = u64;

/// Number of decimal places between the whole-coin unit and lamports.
pub const DECIMALS: u32 = 9;

/// Fee the network charges per transaction signature, in lamports.
pub const LAMPORTS_PER_SIGNATURE: Lamports = 5_000;

/// Parses a base58 account address.
pub fn parse_address(input: &str) -> Result<Pubkey, CoreError> {
    if input.is_empty() {
        return Err(CoreError::invalid_address(input, "empty string"));
    }
    Pubkey::from_str(input).map_err(|e| CoreError::invalid_address(input, e.to_string()))
}

/// Parses a base58 transaction signature.
pub fn parse_signature(input: &str) -> Result<Signature, CoreError> {
    Signature::from_str(input)
        .map_err(|e| CoreError::InvalidSignature(format!("{:?}: {}", input, e)))
}

/// Parses a base58 blockhash.
pub fn parse_blockhash(input: &str) -> Result<Hash, CoreError> {
    Hash::from_str(input).map_err(|e| CoreError::Decode(format!("blockhash {:?}: {}", input, e)))
}
