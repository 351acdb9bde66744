use chain_btc::decode::{decode_transaction, looks_like_txid, DecodedTransaction};
use chain_btc::network::BtcNetwork;
use explorer::{FallbackChain, PrevOutputProvider, RawTxSource};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::WalletError;

/// Decode a transaction given either its raw hex or its id.
///
/// A query shaped like a txid is resolved to raw hex through `source` first.
pub async fn lookup_transaction(
    query: &str,
    source: &dyn RawTxSource,
    network: BtcNetwork,
) -> Result<DecodedTransaction, WalletError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(WalletError::InvalidTransaction(
            "enter a transaction id or raw hex".into(),
        ));
    }

    let decoded = if looks_like_txid(query) {
        debug!(txid = query, provider = source.name(), "resolving txid");
        let raw = source.fetch_raw_tx(query).await?;
        decode_transaction(&raw, network)?
    } else {
        decode_transaction(query, network)?
    };

    info!(txid = %decoded.txid, inputs = decoded.inputs.len(), outputs = decoded.outputs.len(), "decoded transaction");
    Ok(decoded)
}

/// Input and output totals of a decoded transaction, and the fee they imply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeSummary {
    /// Value of each spent output, in input order.
    pub input_values: Vec<u64>,
    pub input_total: u64,
    pub output_total: u64,
    pub fee: u64,
}

/// Look up the value of every output `decoded` spends and compute its fee.
///
/// `address`, when known, is the address the inputs were paid to; providers
/// that can answer from its UTXO set do so first.
pub async fn resolve_fee(
    decoded: &DecodedTransaction,
    providers: &FallbackChain<dyn PrevOutputProvider>,
    address: Option<&str>,
) -> Result<FeeSummary, WalletError> {
    let mut input_values = Vec::with_capacity(decoded.inputs.len());
    for input in &decoded.inputs {
        let value = providers
            .prev_output_value(&input.txid, input.vout, address)
            .await?;
        input_values.push(value);
    }

    let input_total = checked_total(input_values.iter().copied(), "input")?;
    let output_total = checked_total(decoded.outputs.iter().map(|o| o.value), "output")?;
    let fee = input_total.checked_sub(output_total).ok_or_else(|| {
        WalletError::InvalidTransaction(format!(
            "outputs ({output_total} sat) exceed inputs ({input_total} sat)"
        ))
    })?;

    Ok(FeeSummary {
        input_values,
        input_total,
        output_total,
        fee,
    })
}

fn checked_total(mut values: impl Iterator<Item = u64>, side: &str) -> Result<u64, WalletError> {
    values
        .try_fold(0u64, |acc, v| acc.checked_add(v))
        .ok_or_else(|| WalletError::InvalidTransaction(format!("{side} values overflow")))
}
