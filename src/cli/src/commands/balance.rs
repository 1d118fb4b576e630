//! Balance command for the CLI wallet.

use crate::errors::WalletError;
use crate::service::WalletService;
use wallet_core::format_lamports;

/// Runs the balance command and returns the balance in whole units.
pub async fn run(service: &WalletService) -> Result<String, WalletError> {
    let lamports = service.balance().await?;
    Ok(format!("{} SOL", format_lamports(lamports)))
}
