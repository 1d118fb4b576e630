//! Core primitives for the devnet wallet.
//!
//! This crate holds everything that does not touch the disk or the network:
//! keypair import and export, whole-unit/lamport conversion, the transfer
//! builder and the transaction wire encoding.

pub mod amount;
pub mod builder;
pub mod errors;
pub mod keypair;
pub mod transaction;
pub mod types;

// Re-export commonly used types
pub use amount::{format_lamports, parse_sol};
pub use builder::TransferBuilder;
pub use errors::CoreError;
pub use keypair::keypair_from_bytes;
pub use transaction::{
    build_transfer, decode_transaction, encode_transaction, transfers, TransferInstruction,
};
pub use types::{
    parse_address, parse_blockhash, parse_signature, Lamports, LAMPORTS_PER_SIGNATURE,
    LAMPORTS_PER_SOL,
};

pub use solana_sdk::hash::Hash;
pub use solana_sdk::pubkey::Pubkey;
pub use solana_sdk::signature::{Keypair, Signature, Signer};
pub use solana_sdk::transaction::Transaction;
