//! Construction and signing of transfer transactions.

use crate::amount::parse_sol;
use crate::errors::CoreError;
use crate::transaction::{build_transfer, TransferInstruction};
use crate::types::parse_address;
use solana_sdk::hash::Hash;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;
use std::fmt;
use tracing::debug;

/// A validated transfer waiting for its validity anchor.
///
/// [`TransferBuilder::new`] does all input checking without touching the
/// network, so callers can reject bad input before fetching a blockhash.
pub struct TransferBuilder<'a> {
    source: &'a Keypair,
    instruction: TransferInstruction,
}

impl<'a> TransferBuilder<'a> {
    /// Validates the destination address and the whole-unit amount.
    pub fn new(source: &'a Keypair, destination: &str, amount: &str) -> Result<Self, CoreError> {
        let to = parse_address(destination.trim())?;
        let lamports = parse_sol(amount)?;
        let instruction = TransferInstruction { from: source.pubkey(), to, lamports };
        debug!("Validated {}", instruction);
        Ok(Self { source, instruction })
    }

    /// The transfer that will be signed.
    pub fn instruction(&self) -> &TransferInstruction {
        &self.instruction
    }

    /// Wraps the transfer in a message anchored at `recent_blockhash` and signs it.
    pub fn sign(self, recent_blockhash: Hash) -> Result<Transaction, CoreError> {
        let mut transaction = build_transfer(&self.instruction, recent_blockhash);
        transaction
            .try_sign(&[self.source], recent_blockhash)
            .map_err(|e| CoreError::Signing(e.to_string()))?;
        Ok(transaction)
    }

    /// Validates and signs in one step.
    pub fn build(
        source: &'a Keypair,
        destination: &str,
        amount: &str,
        recent_blockhash: Hash,
    ) -> Result<Transaction, CoreError> {
        Self::new(source, destination, amount)?.sign(recent_blockhash)
    }
}

// The source keypair stays out of debug output.
impl fmt::Debug for TransferBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferBuilder")
            .field("instruction", &self.instruction)
            .finish_non_exhaustive()
    }
}
