//! Esplora REST API client (mempool.space, blockstream.info).

use async_trait::async_trait;
use chain_btc::network::BtcNetwork;
use chain_btc::utxo::Utxo;
use serde::Deserialize;
use tracing::debug;

use crate::error::ExplorerError;
use crate::http::{join_url, HttpClient};
use crate::provider::{BalanceProvider, PrevOutputProvider, Provider, RawTxSource, UtxoSource};

#[derive(Debug, Clone)]
pub struct EsploraClient {
    http: HttpClient,
    base_url: String,
}

impl EsploraClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Client pointed at the default public instance for `network`.
    pub fn for_network(http: HttpClient, network: BtcNetwork) -> Self {
        Self::new(http, network.default_esplora_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn fetch_tx(&self, txid: &str) -> Result<EsploraTx, ExplorerError> {
        self.http.get_json(&self.url(&format!("tx/{txid}"))).await
    }
}

#[derive(Debug, Deserialize)]
struct AddressInfo {
    chain_stats: AddressStats,
    #[serde(default)]
    mempool_stats: AddressStats,
}

#[derive(Debug, Default, Deserialize)]
struct AddressStats {
    #[serde(default)]
    funded_txo_sum: u64,
    #[serde(default)]
    spent_txo_sum: u64,
}

impl AddressInfo {
    /// Confirmed plus unconfirmed balance.
    fn balance_sat(&self) -> u64 {
        let funded = self
            .chain_stats
            .funded_txo_sum
            .saturating_add(self.mempool_stats.funded_txo_sum);
        let spent = self
            .chain_stats
            .spent_txo_sum
            .saturating_add(self.mempool_stats.spent_txo_sum);
        funded.saturating_sub(spent)
    }
}

#[derive(Debug, Deserialize)]
struct EsploraTx {
    vout: Vec<EsploraTxOut>,
}

#[derive(Debug, Deserialize)]
struct EsploraTxOut {
    value: u64,
}

impl EsploraTx {
    fn output_value(&self, vout: u32) -> Option<u64> {
        self.vout.get(vout as usize).map(|o| o.value)
    }
}

fn find_utxo_value(utxos: &[Utxo], txid: &str, vout: u32) -> Option<u64> {
    utxos
        .iter()
        .find(|u| u.txid.eq_ignore_ascii_case(txid) && u.vout == vout)
        .map(|u| u.amount_sat)
}

impl Provider for EsploraClient {
    fn name(&self) -> &str {
        "esplora"
    }
}

#[async_trait]
impl UtxoSource for EsploraClient {
    async fn fetch_utxos(&self, address: &str) -> Result<Vec<Utxo>, ExplorerError> {
        self.http
            .get_json(&self.url(&format!("address/{address}/utxo")))
            .await
    }
}

#[async_trait]
impl RawTxSource for EsploraClient {
    async fn fetch_raw_tx(&self, txid: &str) -> Result<String, ExplorerError> {
        self.http.get_text(&self.url(&format!("tx/{txid}/hex"))).await
    }
}

#[async_trait]
impl BalanceProvider for EsploraClient {
    async fn fetch_balance(&self, address: &str) -> Result<u64, ExplorerError> {
        let info: AddressInfo = self
            .http
            .get_json(&self.url(&format!("address/{address}")))
            .await?;
        Ok(info.balance_sat())
    }
}

#[async_trait]
impl PrevOutputProvider for EsploraClient {
    async fn prev_output_value(
        &self,
        txid: &str,
        vout: u32,
        address: Option<&str>,
    ) -> Result<u64, ExplorerError> {
        if let Some(address) = address {
            match self.fetch_utxos(address).await {
                Ok(utxos) => {
                    if let Some(value) = find_utxo_value(&utxos, txid, vout) {
                        return Ok(value);
                    }
                    debug!(%txid, vout, "output not in address UTXO set, fetching transaction");
                }
                Err(e) => debug!(error = %e, "address UTXO lookup failed, fetching transaction"),
            }
        }

        let tx = self.fetch_tx(txid).await?;
        tx.output_value(vout).ok_or_else(|| ExplorerError::OutputNotFound {
            txid: txid.to_string(),
            vout,
        })
    }
}
