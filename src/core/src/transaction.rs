//! Transfer transactions and their wire encoding.
//!
//! Transactions travel as base64 text over the bincode form of the legacy
//! transaction format.

use crate::errors::CoreError;
use crate::types::Lamports;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::packet::PACKET_DATA_SIZE;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::sanitize::Sanitize;
use solana_sdk::system_instruction::{self, SystemInstruction};
use solana_sdk::system_program;
use solana_sdk::transaction::Transaction;
use std::fmt;

/// A plain lamport move from one account to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferInstruction {
    /// Paying account, also the fee payer and only signer
    pub from: Pubkey,
    /// Receiving account
    pub to: Pubkey,
    /// Amount moved
    pub lamports: Lamports,
}

impl TransferInstruction {
    /// The system program instruction that performs this transfer.
    pub fn to_instruction(&self) -> Instruction {
        system_instruction::transfer(&self.from, &self.to, self.lamports)
    }
}

impl fmt::Display for TransferInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transfer {} lamports {} -> {}", self.lamports, self.from, self.to)
    }
}

/// Builds an unsigned transaction carrying `transfer`, paid for by the sender.
pub fn build_transfer(transfer: &TransferInstruction, recent_blockhash: Hash) -> Transaction {
    let message = Message::new_with_blockhash(
        &[transfer.to_instruction()],
        Some(&transfer.from),
        &recent_blockhash,
    );
    Transaction::new_unsigned(message)
}

/// Lists the system transfers carried by a message. Other instructions are skipped.
pub fn transfers(message: &Message) -> Vec<TransferInstruction> {
    let key = |index: u8| message.account_keys.get(usize::from(index)).copied();

    message
        .instructions
        .iter()
        .filter_map(|ix| {
            if !system_program::check_id(&key(ix.program_id_index)?) {
                return None;
            }
            match bincode::deserialize::<SystemInstruction>(&ix.data).ok()? {
                SystemInstruction::Transfer { lamports } => Some(TransferInstruction {
                    from: key(*ix.accounts.first()?)?,
                    to: key(*ix.accounts.get(1)?)?,
                    lamports,
                }),
                _ => None,
            }
        })
        .collect()
}

/// Encodes a transaction for `sendTransaction` with base64 encoding.
pub fn encode_transaction(transaction: &Transaction) -> Result<String, CoreError> {
    let bytes = bincode::serialize(transaction).map_err(|e| CoreError::Encode(e.to_string()))?;
    if bytes.len() > PACKET_DATA_SIZE {
        return Err(CoreError::Encode(format!(
            "transaction is {} bytes, limit is {}",
            bytes.len(),
            PACKET_DATA_SIZE
        )));
    }
    Ok(BASE64.encode(bytes))
}

/// Decodes and structurally checks a base64 transaction.
pub fn decode_transaction(text: &str) -> Result<Transaction, CoreError> {
    let bytes = BASE64
        .decode(text)
        .map_err(|e| CoreError::Decode(format!("base64: {}", e)))?;
    if bytes.len() > PACKET_DATA_SIZE {
        return Err(CoreError::Decode(format!(
            "transaction is {} bytes, limit is {}",
            bytes.len(),
            PACKET_DATA_SIZE
        )));
    }

    let transaction: Transaction =
        bincode::deserialize(&bytes).map_err(|e| CoreError::Decode(e.to_string()))?;
    transaction
        .sanitize()
        .map_err(|e| CoreError::Decode(e.to_string()))?;
    Ok(transaction)
}
