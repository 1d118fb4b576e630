//! Single-keypair wallet storage.

use crate::errors::WalletError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use wallet_core::{keypair_from_bytes, parse_address, Keypair, Signer};

/// The on-disk form of a keypair.
///
/// `secret_key` holds the 64-byte keypair (seed then public key) as
/// comma-separated decimal byte values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    /// The base58 address
    pub public_key: String,
    /// The keypair bytes as decimal text
    pub secret_key: String,
}

impl WalletRecord {
    /// Serializes a keypair.
    pub fn from_keypair(keypair: &Keypair) -> Self {
        let secret_key = keypair
            .to_bytes()
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            public_key: keypair.pubkey().to_string(),
            secret_key,
        }
    }

    /// Decodes and validates the stored keypair.
    pub fn to_keypair(&self) -> Result<Keypair, WalletError> {
        let mut bytes = decode_secret_key(&self.secret_key)?;
        let keypair = keypair_from_bytes(&bytes);
        bytes.iter_mut().for_each(|b| *b = 0);
        let keypair = keypair.map_err(|e| WalletError::CorruptWallet(e.to_string()))?;

        let stored = parse_address(&self.public_key)
            .map_err(|e| WalletError::CorruptWallet(format!("publicKey field: {}", e)))?;
        if stored != keypair.pubkey() {
            return Err(WalletError::CorruptWallet(format!(
                "publicKey {} does not match the secret key (derives {})",
                stored,
                keypair.pubkey()
            )));
        }
        Ok(keypair)
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Parses `"1,2,3"` (optionally wrapped in brackets) into bytes.
fn decode_secret_key(text: &str) -> Result<Vec<u8>, WalletError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .enumerate()
        .map(|(i, part)| {
            part.trim().parse::<u8>().map_err(|_| {
                WalletError::CorruptWallet(format!("secretKey entry {} is not a byte value", i))
            })
        })
        .collect()
}

/// Reads and writes the wallet file at one fixed location.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    /// Creates a store for the wallet file at `path`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// The wallet file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a wallet file is present.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Generates a new keypair and writes it, replacing any existing wallet.
    ///
    /// The record is written to a private temporary file next to the wallet
    /// and renamed over it, so a failed write leaves the old wallet intact.
    pub fn create(&self) -> Result<WalletRecord, WalletError> {
        let record = WalletRecord::from_keypair(&Keypair::new());
        let contents = serde_json::to_string_pretty(&record)
            .map_err(|e| WalletError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // NamedTempFile is created with mode 0600 on unix.
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| WalletError::Io(e.error))?;

        info!("Wallet {} saved to {}", record.public_key, self.path.display());
        Ok(record)
    }

    /// Reads the wallet file and reconstructs the keypair.
    pub fn load(&self) -> Result<Keypair, WalletError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(WalletError::CorruptWallet(format!(
                    "no wallet at {}; create one with `new`",
                    self.path.display()
                )));
            }
            Err(e) => return Err(WalletError::Io(e)),
        };

        let record: WalletRecord = serde_json::from_str(&contents)
            .map_err(|e| WalletError::CorruptWallet(format!("{}: {}", self.path.display(), e)))?;
        let keypair = record.to_keypair()?;
        debug!("Loaded wallet {} from {}", record.public_key, self.path.display());
        Ok(keypair)
    }
}
