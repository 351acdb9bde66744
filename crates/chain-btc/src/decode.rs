use bitcoin::Transaction;
use serde::Serialize;

use crate::address::{address_from_script, ScriptTemplate};
use crate::error::BtcError;
use crate::network::BtcNetwork;

/// Read-only view of a parsed transaction.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedTransaction {
    pub txid: String,
    pub wtxid: String,
    pub version: i32,
    pub locktime: u32,
    /// Serialized size in bytes, witness included.
    pub size: usize,
    pub vsize: usize,
    pub weight: u64,
    pub inputs: Vec<DecodedInput>,
    pub outputs: Vec<DecodedOutput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecodedInput {
    /// Previous transaction id in display (reversed) byte order.
    pub txid: String,
    pub vout: u32,
    pub script_sig: String,
    pub sequence: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub witness: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecodedOutput {
    /// Value in satoshis.
    pub value: u64,
    pub script_pubkey: String,
    /// `None` when the script matches no recoverable template.
    pub address: Option<String>,
    pub script_type: Option<ScriptTemplate>,
}

/// Whether `s` has the shape of a transaction id (64 hex characters).
pub fn looks_like_txid(s: &str) -> bool {
    let s = s.trim();
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Parse a raw transaction in hex and project it into a [`DecodedTransaction`].
pub fn decode_transaction(raw_hex: &str, network: BtcNetwork) -> Result<DecodedTransaction, BtcError> {
    let bytes = hex::decode(raw_hex.trim())
        .map_err(|e| BtcError::InvalidTransaction(format!("not valid hex: {e}")))?;
    let tx: Transaction = bitcoin::consensus::deserialize(&bytes)
        .map_err(|e| BtcError::InvalidTransaction(format!("failed to parse transaction: {e}")))?;

    let inputs = tx
        .input
        .iter()
        .map(|input| DecodedInput {
            txid: input.previous_output.txid.to_string(),
            vout: input.previous_output.vout,
            script_sig: hex::encode(input.script_sig.as_bytes()),
            sequence: input.sequence.0,
            witness: input.witness.iter().map(hex::encode).collect(),
        })
        .collect();

    let outputs = tx
        .output
        .iter()
        .map(|output| {
            let recovered = address_from_script(&output.script_pubkey, network);
            DecodedOutput {
                value: output.value.to_sat(),
                script_pubkey: hex::encode(output.script_pubkey.as_bytes()),
                script_type: recovered.as_ref().map(|r| r.template),
                address: recovered.map(|r| r.address),
            }
        })
        .collect();

    Ok(DecodedTransaction {
        txid: tx.compute_txid().to_string(),
        wtxid: tx.compute_wtxid().to_string(),
        version: tx.version.0,
        locktime: tx.lock_time.to_consensus_u32(),
        size: bytes.len(),
        vsize: tx.vsize(),
        weight: tx.weight().to_wu(),
        inputs,
        outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::parse_wif;
    use crate::transaction::{build_transaction, sender_address, sign_transaction, to_hex, SpendScript};
    use crate::utxo::{select_utxos, Utxo, UtxoStatus};

    /// Coinbase transaction of the Bitcoin genesis block.
    const GENESIS_COINBASE: &str = "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff4d04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73ffffffff0100f2052a01000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000";
    const GENESIS_TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

    #[test]
    fn decodes_genesis_coinbase() {
        let decoded = decode_transaction(GENESIS_COINBASE, BtcNetwork::Mainnet).unwrap();
        assert_eq!(decoded.txid, GENESIS_TXID);
        assert_eq!(decoded.wtxid, GENESIS_TXID);
        assert_eq!(decoded.version, 1);
        assert_eq!(decoded.locktime, 0);
        assert_eq!(decoded.size, 204);
        assert_eq!(decoded.vsize, 204);

        assert_eq!(decoded.inputs.len(), 1);
        assert_eq!(decoded.inputs[0].txid, "0".repeat(64));
        assert_eq!(decoded.inputs[0].vout, u32::MAX);
        assert_eq!(decoded.inputs[0].sequence, u32::MAX);
        assert!(decoded.inputs[0].script_sig.starts_with("04ffff001d"));

        assert_eq!(decoded.outputs.len(), 1);
        assert_eq!(decoded.outputs[0].value, 5_000_000_000);
        // Pay-to-pubkey is not a recoverable template.
        assert_eq!(decoded.outputs[0].address, None);
        assert_eq!(decoded.outputs[0].script_type, None);
    }

    #[test]
    fn decoding_twice_gives_same_id() {
        let a = decode_transaction(GENESIS_COINBASE, BtcNetwork::Mainnet).unwrap();
        let b = decode_transaction(&format!("  {GENESIS_COINBASE}\n"), BtcNetwork::Mainnet).unwrap();
        assert_eq!(a.txid, b.txid);
    }

    #[test]
    fn invalid_hex_is_invalid_transaction() {
        assert!(matches!(
            decode_transaction("zz", BtcNetwork::Mainnet),
            Err(BtcError::InvalidTransaction(_))
        ));
        assert!(matches!(
            decode_transaction("abc", BtcNetwork::Mainnet),
            Err(BtcError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn truncated_or_padded_bytes_are_invalid() {
        let truncated = &GENESIS_COINBASE[..GENESIS_COINBASE.len() - 2];
        assert!(decode_transaction(truncated, BtcNetwork::Mainnet).is_err());
        let padded = format!("{GENESIS_COINBASE}00");
        assert!(decode_transaction(&padded, BtcNetwork::Mainnet).is_err());
        assert!(decode_transaction("", BtcNetwork::Mainnet).is_err());
    }

    #[test]
    fn built_segwit_transaction_decodes_with_addresses() {
        let key = parse_wif(
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn",
            BtcNetwork::Mainnet,
        )
        .unwrap();
        let sender = sender_address(&key, SpendScript::P2wpkh, BtcNetwork::Mainnet).unwrap();
        let utxo = Utxo {
            txid: "ab".repeat(32),
            vout: 2,
            amount_sat: 150_000,
            status: UtxoStatus::default(),
        };
        let selection = select_utxos(&[utxo], 100_000, 1_000).unwrap();
        let unsigned = build_transaction(
            &selection,
            "3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN",
            100_000,
            1_000,
            &sender,
            BtcNetwork::Mainnet,
        )
        .unwrap();
        let signed = sign_transaction(&unsigned, &key, SpendScript::P2wpkh).unwrap();
        let raw = to_hex(&signed);

        let decoded = decode_transaction(&raw, BtcNetwork::Mainnet).unwrap();

        assert_eq!(decoded.txid, signed.compute_txid().to_string());
        assert_ne!(decoded.txid, decoded.wtxid);
        assert_eq!(decoded.version, 2);
        assert_eq!(decoded.size, raw.len() / 2);
        assert!(decoded.vsize < decoded.size);
        assert_eq!(decoded.inputs[0].txid, "ab".repeat(32));
        assert_eq!(decoded.inputs[0].vout, 2);
        assert_eq!(decoded.inputs[0].witness.len(), 2);

        assert_eq!(decoded.outputs[0].value, 100_000);
        assert_eq!(
            decoded.outputs[0].address.as_deref(),
            Some("3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN")
        );
        assert_eq!(decoded.outputs[0].script_type, Some(ScriptTemplate::P2sh));
        assert_eq!(decoded.outputs[1].value, 49_000);
        assert_eq!(
            decoded.outputs[1].address.as_deref(),
            Some("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4")
        );
    }

    #[test]
    fn txid_shape_detection() {
        assert!(looks_like_txid(GENESIS_TXID));
        assert!(looks_like_txid(&GENESIS_TXID.to_uppercase()));
        assert!(!looks_like_txid(&GENESIS_TXID[..63]));
        assert!(!looks_like_txid(GENESIS_COINBASE));
        assert!(!looks_like_txid(&"g".repeat(64)));
    }
}
