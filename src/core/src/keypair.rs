//! Import and export of keypairs in the network's 64-byte layout: the
//! 32-byte secret seed followed by the 32-byte public key.

use crate::errors::CoreError;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::signer::keypair::keypair_from_seed;

/// Length of the serialized keypair.
pub const KEYPAIR_LEN: usize = 64;

/// Rebuilds a keypair from its 64-byte form, checking that the stored
/// public half is the one the seed derives.
pub fn keypair_from_bytes(bytes: &[u8]) -> Result<Keypair, CoreError> {
    if bytes.len() != KEYPAIR_LEN {
        return Err(CoreError::InvalidKey(format!(
            "expected {} bytes, got {}",
            KEYPAIR_LEN,
            bytes.len()
        )));
    }

    let keypair =
        keypair_from_seed(&bytes[..32]).map_err(|e| CoreError::InvalidKey(e.to_string()))?;
    if keypair.pubkey().to_bytes()[..] != bytes[32..] {
        return Err(CoreError::InvalidKey(
            "public key does not match the secret key".to_string(),
        ));
    }
    Ok(keypair)
}
