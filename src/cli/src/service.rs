//! The four wallet operations.
//!
//! Each operation loads what it needs from the key store, talks to the node
//! and either completes, confirmation included, or returns one error. Nothing
//! is cached between operations; the wallet file is re-read every time.

use crate::errors::WalletError;
use crate::rpc::{RpcClient, TransactionStatus, ValidityAnchor};
use crate::wallet::KeyStore;
use std::time::Duration;
use tracing::{debug, info};
use wallet_core::{
    format_lamports, parse_address, parse_sol, Lamports, Pubkey, Signature, Signer,
    TransferBuilder,
};

/// Amount requested by `airdrop` when none is given.
pub const DEFAULT_AIRDROP: &str = "1";

/// Oldest validity anchor the service will sign with.
pub const ANCHOR_MAX_AGE: Duration = Duration::from_secs(30);

/// Orchestrates the key store, the transfer builder and the RPC client.
#[derive(Debug)]
pub struct WalletService {
    keystore: KeyStore,
    rpc: RpcClient,
}

impl WalletService {
    /// Creates a service over the given store and client.
    pub fn new(keystore: KeyStore, rpc: RpcClient) -> Self {
        Self { keystore, rpc }
    }

    /// The key store in use.
    pub fn keystore(&self) -> &KeyStore {
        &self.keystore
    }

    /// The RPC client in use.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Creates a new wallet, replacing any existing one, and returns its address.
    pub async fn create(&self) -> Result<Pubkey, WalletError> {
        let record = self.keystore.create()?;
        parse_address(&record.public_key)
            .map_err(|e| WalletError::CorruptWallet(format!("freshly written wallet: {}", e)))
    }

    /// Requests `amount` whole units from the faucet and waits for confirmation.
    pub async fn airdrop(&self, amount: Option<&str>) -> Result<Signature, WalletError> {
        let lamports = parse_sol(amount.unwrap_or(DEFAULT_AIRDROP))?;
        let address = self.keystore.load()?.pubkey();
        info!("Requesting airdrop of {} lamports to {}", lamports, address);

        let signature = self.rpc.request_airdrop(&address, lamports).await?;
        debug!("Airdrop signature {}", signature);

        match self.rpc.confirm_transaction(&signature).await? {
            TransactionStatus::Failed(reason) => {
                Err(WalletError::TransactionFailed { signature, reason })
            }
            _ => {
                info!("Airdrop of {} to {} confirmed", format_lamports(lamports), address);
                Ok(signature)
            }
        }
    }

    /// Returns the wallet balance in lamports.
    pub async fn balance(&self) -> Result<Lamports, WalletError> {
        let address = self.keystore.load()?.pubkey();
        let balance = self.rpc.get_balance(&address).await?;
        debug!("Balance of {}: {} lamports", address, balance);
        Ok(balance)
    }

    /// Sends `amount` whole units to `destination` and waits for the outcome.
    pub async fn transfer(
        &self,
        destination: &str,
        amount: &str,
    ) -> Result<Signature, WalletError> {
        let keypair = self.keystore.load()?;
        // Reject bad input before spending a round trip on the anchor.
        let builder = TransferBuilder::new(&keypair, destination, amount)?;
        info!("Transferring: {}", builder.instruction());

        let anchor = self.fresh_anchor().await?;
        let transaction = builder.sign(anchor.blockhash)?;

        let submitted = self
            .rpc
            .submit_transaction(&transaction, anchor.last_valid_block_height)
            .await?;
        match submitted.status {
            TransactionStatus::Failed(reason) => Err(WalletError::TransactionFailed {
                signature: submitted.signature,
                reason,
            }),
            _ => Ok(submitted.signature),
        }
    }

    async fn fresh_anchor(&self) -> Result<ValidityAnchor, WalletError> {
        let anchor = self.rpc.get_latest_blockhash().await?;
        if anchor.is_fresh(ANCHOR_MAX_AGE) {
            return Ok(anchor);
        }
        debug!("Blockhash {} went stale before signing, refetching", anchor.blockhash);
        self.rpc.get_latest_blockhash().await
    }
}
