//! Saving wallets and created transactions to local files.

use std::fs;
use std::path::{Path, PathBuf};

use chain_btc::utxo::Utxo;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::error::WalletError;
use crate::tx_creator::CreatedTransaction;
use crate::wallet::BitcoinWallet;

/// File contents written by [`export_transaction_json`].
#[derive(Debug, Serialize)]
struct TransactionExport<'a> {
    hex: &'a str,
    fee: u64,
    change: u64,
    utxos: &'a [Utxo],
}

/// Labelled, one-field-per-line rendering of a wallet.
pub fn wallet_text(wallet: &BitcoinWallet) -> String {
    let fields = [
        ("Network", wallet.network.to_string()),
        ("Derivation Path", wallet.derivation_path.clone()),
        ("Mnemonic", wallet.mnemonic.clone()),
        ("Bech32 Address", wallet.bech32_address.clone()),
        ("Legacy Address", wallet.legacy_address.clone()),
        ("P2SH Address", wallet.p2sh_address.clone()),
        ("WIF", wallet.wif.clone()),
        ("WIF (compressed)", wallet.wif_compressed.clone()),
        ("Private Key (hex)", wallet.private_key_hex.clone()),
        ("Public Key", wallet.public_key.clone()),
        ("Public Key (compressed)", wallet.public_key_compressed.clone()),
        ("xprv", wallet.xprv.clone()),
        ("xpub", wallet.xpub.clone()),
    ];

    let mut out = String::new();
    for (label, value) in fields {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(&value);
        out.push('\n');
    }
    out
}

/// Write `wallet` to `<dir>/wallet-<first 8 chars of bech32>.txt`.
pub fn export_wallet_text(wallet: &BitcoinWallet, dir: &Path) -> Result<PathBuf, WalletError> {
    let prefix: String = wallet.bech32_address.chars().take(8).collect();
    let path = dir.join(format!("wallet-{prefix}.txt"));
    fs::create_dir_all(dir)?;
    fs::write(&path, wallet_text(wallet))?;
    info!(path = %path.display(), "exported wallet");
    Ok(path)
}

/// Write `tx` as pretty JSON to `<dir>/tx-<unix millis>.json`.
pub fn export_transaction_json(tx: &CreatedTransaction, dir: &Path) -> Result<PathBuf, WalletError> {
    let export = TransactionExport {
        hex: &tx.hex,
        fee: tx.fee,
        change: tx.change,
        utxos: &tx.selected_utxos,
    };
    let body = serde_json::to_string_pretty(&export)?;

    let path = dir.join(format!("tx-{}.json", Utc::now().timestamp_millis()));
    fs::create_dir_all(dir)?;
    fs::write(&path, body)?;
    info!(path = %path.display(), txid = %tx.txid, "exported transaction");
    Ok(path)
}
