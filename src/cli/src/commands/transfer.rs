//! Transfer command for the CLI wallet.

use crate::errors::WalletError;
use crate::service::WalletService;

/// Runs the transfer command and returns the transaction signature.
pub async fn run(service: &WalletService, to: &str, amount: &str) -> Result<String, WalletError> {
    let signature = service.transfer(to, amount).await?;
    Ok(signature.to_string())
}
