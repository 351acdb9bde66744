use chain_btc::error::BtcError;
use crypto_utils::error::CryptoError;
use explorer::ExplorerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("insufficient funds: have {have} sat, need {need} sat")]
    InsufficientFunds { have: u64, need: u64 },

    #[error("Transaction build failed: {0}")]
    TransactionFailed(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Cipher error: {0}")]
    Cipher(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl From<CryptoError> for WalletError {
    fn from(e: CryptoError) -> Self {
        WalletError::Cipher(e.to_string())
    }
}

impl From<BtcError> for WalletError {
    fn from(e: BtcError) -> Self {
        match e {
            BtcError::InsufficientFunds { have, need } => WalletError::InsufficientFunds { have, need },
            BtcError::InvalidPrivateKey(msg) => WalletError::InvalidPrivateKey(msg),
            BtcError::InvalidAddress(msg) => WalletError::InvalidAddress(msg),
            BtcError::InvalidTransaction(msg) => WalletError::InvalidTransaction(msg),
            other => WalletError::TransactionFailed(other.to_string()),
        }
    }
}

impl From<ExplorerError> for WalletError {
    fn from(e: ExplorerError) -> Self {
        WalletError::Network(e.to_string())
    }
}

impl From<std::io::Error> for WalletError {
    fn from(e: std::io::Error) -> Self {
        WalletError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(e: serde_json::Error) -> Self {
        WalletError::Export(e.to_string())
    }
}
