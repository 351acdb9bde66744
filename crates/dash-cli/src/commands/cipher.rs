//! Demo XOR text cipher.
//!
//! Obfuscation for the dashboard's demo panel. Anyone with the ciphertext
//! can recover the text; do not use it to protect anything.

use anyhow::{Context, Result};
use clap::Subcommand;
use crypto_utils::xor;
use crypto_utils::ZeroizingString;

use crate::context::AppContext;
use crate::output;

#[derive(Subcommand)]
pub enum CipherAction {
    /// Print a random 16-byte key as hex.
    Keygen,
    /// XOR text with a key and print it as base64.
    Encrypt {
        #[arg(long, env = "BTCDASH_CIPHER_KEY", hide_env_values = true)]
        key: String,
        #[arg(long)]
        text: String,
    },
    /// Reverse `encrypt`.
    Decrypt {
        #[arg(long, env = "BTCDASH_CIPHER_KEY", hide_env_values = true)]
        key: String,
        /// Base64 output of `encrypt`.
        #[arg(long)]
        text: String,
    },
}

pub fn run(action: CipherAction, ctx: &AppContext) -> Result<()> {
    let (label, value) = match action {
        CipherAction::Keygen => ("key", xor::generate_key()),
        CipherAction::Encrypt { key, text } => {
            let key = ZeroizingString::new(key);
            ("ciphertext", xor::encrypt(&text, &key).context("encryption failed")?)
        }
        CipherAction::Decrypt { key, text } => {
            let key = ZeroizingString::new(key);
            ("plaintext", xor::decrypt(&text, &key).context("decryption failed")?)
        }
    };

    if ctx.json {
        output::print_value(&serde_json::json!({ label: value }), true);
    } else {
        println!("{value}");
    }
    Ok(())
}
