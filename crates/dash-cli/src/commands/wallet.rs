//! Wallet commands.
//!
//! Wallets are printed once and never stored unless `--export` is given.

use anyhow::{Context, Result};
use clap::Subcommand;
use wallet_core::export::{export_wallet_text, wallet_text};
use wallet_core::{generate_wallet, wallet_from_mnemonic, BitcoinWallet, WordCount};

use crate::context::AppContext;
use crate::output;

#[derive(Subcommand)]
pub enum WalletAction {
    /// Generate a wallet from a fresh mnemonic.
    Generate {
        /// Mnemonic length: 12 or 24 words.
        #[arg(long, default_value = "12")]
        words: WordCount,
        /// Also write the wallet to a text file in the export directory.
        #[arg(long)]
        export: bool,
    },
    /// Rebuild a wallet from an existing mnemonic.
    Restore {
        #[arg(long, env = "BTCDASH_MNEMONIC", hide_env_values = true)]
        mnemonic: String,
        /// Optional BIP-39 passphrase.
        #[arg(long, default_value = "", hide_default_value = true)]
        passphrase: String,
        #[arg(long)]
        export: bool,
    },
}

pub fn run(action: WalletAction, ctx: &AppContext) -> Result<()> {
    let (wallet, export) = match action {
        WalletAction::Generate { words, export } => (
            generate_wallet(ctx.network(), words).context("wallet generation failed")?,
            export,
        ),
        WalletAction::Restore {
            mnemonic,
            passphrase,
            export,
        } => (
            wallet_from_mnemonic(&mnemonic, &passphrase, ctx.network())
                .context("wallet restore failed")?,
            export,
        ),
    };

    show(&wallet, ctx.json);

    if export {
        let path = export_wallet_text(&wallet, &ctx.settings.export_dir)
            .context("failed to export wallet")?;
        output::print_success(&format!("wallet saved to {}", path.display()), ctx.json);
    }
    Ok(())
}

fn show(wallet: &BitcoinWallet, json: bool) {
    if json {
        output::print_value(wallet, true);
    } else {
        print!("{}", wallet_text(wallet));
    }
}
