//! Wallet-level operations of the dashboard: HD wallet generation and
//! restore, payment creation from a WIF key, transaction lookup and file
//! export. Chain primitives live in `chain-btc`, network access behind the
//! `explorer` traits.

pub mod error;
pub mod export;
pub mod hd_derivation;
pub mod lookup;
pub mod mnemonic;
pub mod tx_creator;
pub mod wallet;

pub use error::WalletError;
pub use export::{export_transaction_json, export_wallet_text};
pub use lookup::{lookup_transaction, resolve_fee, FeeSummary};
pub use mnemonic::WordCount;
pub use tx_creator::{create_transaction, CreateTransactionRequest, CreatedTransaction};
pub use wallet::{generate_wallet, wallet_from_mnemonic, BitcoinWallet};
