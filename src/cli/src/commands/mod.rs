//! Commands for the CLI wallet.
//!
//! Each command runs one wallet operation and renders its outcome as a line
//! of text for the terminal.

pub mod airdrop;
pub mod balance;
pub mod create;
pub mod transfer;
