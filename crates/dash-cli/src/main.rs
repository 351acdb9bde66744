//! btcdash: Bitcoin wallet and transaction tooling from the terminal.
//!
//! Wallet generation, payment creation, transaction decoding, address
//! lookups against public block explorers, and a demo XOR text cipher.

mod commands;
mod config;
mod context;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use chain_btc::network::BtcNetwork;
use clap::{Parser, Subcommand};

use crate::config::{FileConfig, Overrides, Settings};
use crate::context::AppContext;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// btcdash: Bitcoin wallet and transaction toolkit.
#[derive(Parser)]
#[command(name = "btcdash", version, about)]
struct Cli {
    /// Output in JSON format (no colors, machine-readable).
    #[arg(long, global = true)]
    json: bool,

    /// Bitcoin network: mainnet, testnet or signet.
    #[arg(long, global = true)]
    network: Option<BtcNetwork>,

    /// Path to a JSON config file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Esplora API base URL (mempool.space, blockstream.info or self-hosted).
    #[arg(long, global = true, value_name = "URL")]
    esplora_url: Option<String>,

    /// HTTP timeout in seconds, 0 for none.
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Directory for exported files.
    #[arg(long, global = true, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Debug logging (ignored when RUST_LOG is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate or restore HD wallets.
    Wallet {
        #[command(subcommand)]
        action: commands::wallet::WalletAction,
    },
    /// Create and decode transactions.
    Tx {
        #[command(subcommand)]
        action: commands::tx::TxAction,
    },
    /// Balance, history and validation of addresses.
    #[command(alias = "addr")]
    Address {
        #[command(subcommand)]
        action: commands::address::AddressAction,
    },
    /// Demo XOR text cipher. Not encryption.
    Cipher {
        #[command(subcommand)]
        action: commands::cipher::CipherAction,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let json = cli.json;
    if let Err(e) = run(cli).await {
        output::print_error(&format!("{e:#}"), json);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = FileConfig::discover(cli.config.as_deref())?;
    let settings = Settings::resolve(
        file,
        Overrides {
            network: cli.network,
            esplora_url: cli.esplora_url,
            timeout_secs: cli.timeout,
            export_dir: cli.export_dir,
        },
    );
    let ctx = AppContext::new(settings, cli.json)?;

    match cli.command {
        Commands::Wallet { action } => commands::wallet::run(action, &ctx),
        Commands::Tx { action } => commands::tx::run(action, &ctx).await,
        Commands::Address { action } => commands::address::run(action, &ctx).await,
        Commands::Cipher { action } => commands::cipher::run(action, &ctx),
    }
}
