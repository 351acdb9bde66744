use serde::{Deserialize, Serialize};

use crate::error::BtcError;

/// A single unspent transaction output (UTXO).
///
/// Field names follow the Esplora `/address/{addr}/utxo` response so a
/// provider's JSON deserializes straight into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Transaction ID as a hex string (big-endian / display order).
    pub txid: String,
    /// Output index within the transaction.
    pub vout: u32,
    /// Value in satoshis.
    #[serde(rename = "value")]
    pub amount_sat: u64,
    #[serde(default)]
    pub status: UtxoStatus,
}

/// Confirmation state reported alongside a UTXO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoStatus {
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_time: Option<u64>,
}

/// Result of UTXO selection: the chosen UTXOs and their aggregate value.
#[derive(Debug, Clone)]
pub struct UtxoSelection {
    /// The selected UTXOs, in the order they were offered.
    pub selected: Vec<Utxo>,
    /// Total value of the selected UTXOs in satoshis.
    pub total_sat: u64,
}

/// Select UTXOs to cover `amount_sat + fee_sat`.
///
/// First-fit: UTXOs are taken in the order the data source returned them
/// and selection stops as soon as the running total reaches the target.
/// No reordering, no dust or output-count optimisation.
///
/// When the whole set is not enough, the error reports the total available
/// (`have`) and `amount_sat + fee_sat` (`need`).
pub fn select_utxos(
    utxos: &[Utxo],
    amount_sat: u64,
    fee_sat: u64,
) -> Result<UtxoSelection, BtcError> {
    if amount_sat == 0 {
        return Err(BtcError::InvalidAmount("amount must be positive".into()));
    }
    let target_sat = amount_sat
        .checked_add(fee_sat)
        .ok_or_else(|| BtcError::InvalidAmount("amount + fee overflows".into()))?;

    let mut selected: Vec<Utxo> = Vec::new();
    let mut total_sat: u64 = 0;

    for utxo in utxos {
        selected.push(utxo.clone());
        total_sat = total_sat.saturating_add(utxo.amount_sat);
        if total_sat >= target_sat {
            return Ok(UtxoSelection { selected, total_sat });
        }
    }

    Err(BtcError::InsufficientFunds {
        have: total_sat,
        need: target_sat,
    })
}
