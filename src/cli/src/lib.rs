//! CLI wallet for Solana-style devnet JSON-RPC nodes.

pub mod commands;
pub mod config;
pub mod errors;
pub mod rpc;
pub mod service;
pub mod wallet;

// Re-export commonly used types and functions
pub use commands::{airdrop, balance, create, transfer};
pub use config::{Cluster, Commitment, RpcConfig, WalletConfig};
pub use errors::WalletError;
pub use rpc::{RpcClient, SubmittedTransaction, TransactionStatus, ValidityAnchor};
pub use service::WalletService;
pub use wallet::{KeyStore, WalletRecord};
