//! Configuration for the CLI wallet.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Public devnet endpoint, used unless the configuration says otherwise.
pub const DEVNET_URL: &str = "https://api.devnet.solana.com";

/// The network an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    /// Public development network with a faucet
    Devnet,
    /// Public test network with a faucet
    Testnet,
    /// A local test validator
    Localnet,
    /// The production network; has no faucet
    MainnetBeta,
}

impl Cluster {
    /// Whether the cluster runs a faucet behind `requestAirdrop`.
    pub fn supports_airdrop(self) -> bool {
        !matches!(self, Cluster::MainnetBeta)
    }

    /// Recognizes the cluster behind an endpoint from its host name.
    pub fn from_url(url: &str) -> Option<Cluster> {
        let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
        let host = rest
            .split(|c: char| c == '/' || c == ':')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if host.contains("mainnet") {
            Some(Cluster::MainnetBeta)
        } else if host.contains("testnet") {
            Some(Cluster::Testnet)
        } else if host.contains("devnet") {
            Some(Cluster::Devnet)
        } else if matches!(host.as_str(), "localhost" | "127.0.0.1" | "0.0.0.0") {
            Some(Cluster::Localnet)
        } else {
            None
        }
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "localnet" => Ok(Cluster::Localnet),
            "mainnet-beta" => Ok(Cluster::MainnetBeta),
            other => Err(format!(
                "unknown cluster {:?}; expected devnet, testnet, localnet or mainnet-beta",
                other
            )),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
            Cluster::Localnet => "localnet",
            Cluster::MainnetBeta => "mainnet-beta",
        };
        f.write_str(name)
    }
}

/// Commitment level a node must reach before a result counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Seen by the node, may still be rolled back
    Processed,
    /// Voted on by a supermajority
    Confirmed,
    /// Rooted, cannot be rolled back
    Finalized,
}

impl Commitment {
    /// Name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// Connection settings handed to the RPC client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// The JSON-RPC endpoint
    pub url: String,
    /// The network behind the endpoint
    pub cluster: Cluster,
    /// Commitment used for queries and confirmation
    pub commitment: Commitment,
    /// Timeout for a single HTTP request, in milliseconds
    pub request_timeout_ms: u64,
    /// Delay between confirmation polls, in milliseconds
    pub poll_interval_ms: u64,
    /// Total confirmation wait budget, in milliseconds
    pub confirm_timeout_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEVNET_URL.to_string(),
            cluster: Cluster::Devnet,
            commitment: Commitment::Confirmed,
            request_timeout_ms: 30_000,
            poll_interval_ms: 500,
            confirm_timeout_ms: 60_000,
        }
    }
}

impl RpcConfig {
    /// Settings for an endpoint URL with every other value defaulted.
    pub fn for_url(url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.set_url(url);
        config
    }

    /// Points the settings at another endpoint. The cluster follows the URL
    /// when the host identifies one and is left alone otherwise.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
        if let Some(cluster) = Cluster::from_url(&self.url) {
            self.cluster = cluster;
        }
    }

    /// Timeout for a single HTTP request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Delay between confirmation polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Total confirmation wait budget.
    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_millis(self.confirm_timeout_ms)
    }
}

/// Configuration for the CLI wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Where the wallet file lives
    pub wallet_path: PathBuf,
    /// The node to talk to
    pub rpc: RpcConfig,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            wallet_path: PathBuf::from("wallet.json"),
            rpc: RpcConfig::default(),
        }
    }
}

impl WalletConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default location of the configuration file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("devnet-wallet").join("config.json"))
    }
}
