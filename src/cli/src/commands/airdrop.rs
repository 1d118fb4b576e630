//! Airdrop command for the CLI wallet.

use crate::errors::WalletError;
use crate::service::{WalletService, DEFAULT_AIRDROP};
use tracing::info;

/// Runs the airdrop command and returns a summary line.
pub async fn run(service: &WalletService, amount: Option<&str>) -> Result<String, WalletError> {
    let amount = amount.unwrap_or(DEFAULT_AIRDROP);
    let signature = service.airdrop(Some(amount)).await?;
    info!("Airdrop signature: {}", signature);
    Ok(format!("{} SOL airdrop completed ({})", amount.trim(), signature))
}
