//! New wallet command for the CLI wallet.

use crate::errors::WalletError;
use crate::service::WalletService;
use tracing::warn;

/// Runs the new command and returns the created address.
pub async fn run(service: &WalletService) -> Result<String, WalletError> {
    if service.keystore().exists() {
        warn!(
            "Overwriting the existing wallet at {}",
            service.keystore().path().display()
        );
    }
    let address = service.create().await?;
    Ok(address.to_string())
}
