use async_trait::async_trait;
use chain_btc::utxo::Utxo;

use crate::error::ExplorerError;
use crate::types::AddressTransaction;

/// Anything that answers explorer queries and can be named in logs and
/// fallback error reports.
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;
}

/// Lists the unspent outputs locked to an address.
#[async_trait]
pub trait UtxoSource: Provider {
    /// UTXOs in the order the provider returned them.
    async fn fetch_utxos(&self, address: &str) -> Result<Vec<Utxo>, ExplorerError>;
}

/// Resolves a transaction id to its raw serialization.
#[async_trait]
pub trait RawTxSource: Provider {
    /// Raw transaction as hex, surrounding whitespace removed.
    async fn fetch_raw_tx(&self, txid: &str) -> Result<String, ExplorerError>;
}

#[async_trait]
pub trait BalanceProvider: Provider {
    /// Current balance of `address` in satoshis.
    async fn fetch_balance(&self, address: &str) -> Result<u64, ExplorerError>;
}

#[async_trait]
pub trait HistoryProvider: Provider {
    async fn fetch_history(&self, address: &str) -> Result<Vec<AddressTransaction>, ExplorerError>;
}

#[async_trait]
pub trait PrevOutputProvider: Provider {
    /// Value in satoshis of output `vout` of transaction `txid`.
    ///
    /// `address`, when known, lets a provider answer from the address's
    /// UTXO set before fetching the whole transaction.
    async fn prev_output_value(
        &self,
        txid: &str,
        vout: u32,
        address: Option<&str>,
    ) -> Result<u64, ExplorerError>;
}
