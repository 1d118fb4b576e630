//! CLI wallet for Solana-style devnet JSON-RPC nodes.

use anyhow::{anyhow, Result};
use colored::Colorize;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wallet_cli::commands::{airdrop, balance, create, transfer};
use wallet_cli::{Cluster, KeyStore, RpcClient, WalletConfig, WalletService};

/// Command line arguments for the CLI wallet.
#[derive(Debug, StructOpt)]
#[structopt(name = "devnet-wallet", about = "Single-keypair wallet for devnet")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Path to the wallet file
    #[structopt(short, long, parse(from_os_str))]
    wallet: Option<PathBuf>,

    /// JSON-RPC endpoint to use instead of the configured one
    #[structopt(short, long)]
    url: Option<String>,

    /// Cluster behind the endpoint (devnet, testnet, localnet, mainnet-beta)
    #[structopt(long)]
    cluster: Option<Cluster>,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the CLI wallet.
#[derive(Debug, StructOpt)]
enum Command {
    /// Create a new wallet, replacing any existing one
    #[structopt(name = "new")]
    New,

    /// Request an airdrop to the wallet
    #[structopt(name = "airdrop")]
    Airdrop {
        /// Amount in SOL (defaults to 1)
        #[structopt(allow_hyphen_values = true)]
        amount: Option<String>,
    },

    /// Check the wallet balance
    #[structopt(name = "balance")]
    Balance,

    /// Transfer SOL to another wallet
    #[structopt(name = "transfer")]
    Transfer {
        /// Recipient address
        to: String,

        /// Amount in SOL
        #[structopt(allow_hyphen_values = true)]
        amount: String,
    },
}

fn load_config(opt: &Opt) -> Result<WalletConfig> {
    let mut config = match &opt.config {
        Some(path) => WalletConfig::from_file(path)?,
        None => match WalletConfig::default_path().filter(|path| path.exists()) {
            Some(path) => {
                debug!("Using configuration at {}", path.display());
                WalletConfig::from_file(path)?
            }
            None => WalletConfig::default(),
        },
    };

    if let Some(path) = &opt.wallet {
        config.wallet_path = path.clone();
    }
    if let Some(url) = &opt.url {
        config.rpc.set_url(url.clone());
    }
    if let Some(cluster) = opt.cluster {
        config.rpc.cluster = cluster;
    }
    Ok(config)
}

async fn run(opt: Opt) -> Result<()> {
    let config = load_config(&opt)?;
    let service = WalletService::new(
        KeyStore::new(config.wallet_path.clone()),
        RpcClient::new(config.rpc.clone())?,
    );

    match opt.cmd {
        Command::New => {
            let address = create::run(&service).await?;
            let path = config.wallet_path.display();
            println!("{} {}", "Wallet created and saved to".green(), path);
            println!("{} {}", "Address:".green(), address);
        }
        Command::Airdrop { amount } => {
            let summary = airdrop::run(&service, amount.as_deref()).await?;
            println!("{}", summary.green());
        }
        Command::Balance => {
            let balance = balance::run(&service).await?;
            println!("{} {}", "Balance:".green(), balance);
        }
        Command::Transfer { to, amount } => {
            let signature = transfer::run(&service, &to, &amount).await?;
            println!("{} {}", "Transfer completed. Signature:".green(), signature);
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", e);
    }

    // Parse command line arguments
    let opt = Opt::from_args();

    let outcome = tokio::select! {
        result = run(opt) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; any submitted transaction may still land");
            Err(anyhow!("interrupted"))
        }
    };

    if let Err(e) = outcome {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}
