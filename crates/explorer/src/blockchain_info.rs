//! blockchain.info JSON API client (mainnet only).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use crate::error::ExplorerError;
use crate::http::{join_url, HttpClient};
use crate::provider::{BalanceProvider, HistoryProvider, PrevOutputProvider, Provider};
use crate::types::{AddressTransaction, TxEndpoint};

pub const DEFAULT_BASE_URL: &str = "https://blockchain.info";

#[derive(Debug, Clone)]
pub struct BlockchainInfoClient {
    http: HttpClient,
    base_url: String,
}

impl BlockchainInfoClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn with_default_url(http: HttpClient) -> Self {
        Self::new(http, DEFAULT_BASE_URL)
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[derive(Debug, Deserialize)]
struct BalanceEntry {
    final_balance: u64,
}

#[derive(Debug, Deserialize)]
struct RawAddr {
    #[serde(default)]
    txs: Vec<RawTx>,
}

#[derive(Debug, Deserialize)]
struct RawTx {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    time: i64,
    #[serde(default)]
    result: i64,
    #[serde(default)]
    fee: u64,
    #[serde(default)]
    inputs: Vec<RawInput>,
    #[serde(default)]
    out: Vec<RawOut>,
}

#[derive(Debug, Deserialize)]
struct RawInput {
    prev_out: Option<RawOut>,
}

#[derive(Debug, Deserialize)]
struct RawOut {
    #[serde(default)]
    n: u32,
    #[serde(default)]
    value: u64,
    addr: Option<String>,
}

impl RawOut {
    fn endpoint(&self) -> TxEndpoint {
        TxEndpoint {
            address: self.addr.clone(),
            value_sat: self.value,
        }
    }
}

impl RawTx {
    fn into_history_entry(self) -> AddressTransaction {
        let time = DateTime::from_timestamp(self.time, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        AddressTransaction {
            hash: self.hash,
            time,
            result_sat: self.result,
            fee_sat: self.fee,
            inputs: self
                .inputs
                .iter()
                .filter_map(|i| i.prev_out.as_ref().map(RawOut::endpoint))
                .collect(),
            outputs: self.out.iter().map(RawOut::endpoint).collect(),
        }
    }

    fn output_value(&self, vout: u32) -> Option<u64> {
        self.out.iter().find(|o| o.n == vout).map(|o| o.value)
    }
}

fn balance_for(
    entries: &HashMap<String, BalanceEntry>,
    address: &str,
) -> Result<u64, ExplorerError> {
    entries
        .get(address)
        .map(|e| e.final_balance)
        .ok_or_else(|| ExplorerError::AddressNotFound(address.to_string()))
}

impl Provider for BlockchainInfoClient {
    fn name(&self) -> &str {
        "blockchain.info"
    }
}

#[async_trait]
impl BalanceProvider for BlockchainInfoClient {
    async fn fetch_balance(&self, address: &str) -> Result<u64, ExplorerError> {
        let entries: HashMap<String, BalanceEntry> = self
            .http
            .get_json(&self.url(&format!("balance?active={address}")))
            .await?;
        balance_for(&entries, address)
    }
}

#[async_trait]
impl HistoryProvider for BlockchainInfoClient {
    async fn fetch_history(&self, address: &str) -> Result<Vec<AddressTransaction>, ExplorerError> {
        let raw: RawAddr = self
            .http
            .get_json(&self.url(&format!("rawaddr/{address}")))
            .await?;
        Ok(raw.txs.into_iter().map(RawTx::into_history_entry).collect())
    }
}

#[async_trait]
impl PrevOutputProvider for BlockchainInfoClient {
    async fn prev_output_value(
        &self,
        txid: &str,
        vout: u32,
        _address: Option<&str>,
    ) -> Result<u64, ExplorerError> {
        let tx: RawTx = self
            .http
            .get_json(&self.url(&format!("rawtx/{txid}?format=json")))
            .await?;
        tx.output_value(vout).ok_or_else(|| ExplorerError::OutputNotFound {
            txid: txid.to_string(),
            vout,
        })
    }
}
