use bitcoin::absolute::LockTime;
use bitcoin::address::Address;
use bitcoin::hashes::Hash;
use bitcoin::script::{PushBytesBuf, ScriptBuf};
use bitcoin::secp256k1::{Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::transaction::Version;
use bitcoin::{
    Amount, CompressedPublicKey, OutPoint, PrivateKey, Sequence, Transaction, TxIn, TxOut, Txid,
    Witness,
};
use serde::{Deserialize, Serialize};

use crate::address::parse_address;
use crate::error::BtcError;
use crate::keys::public_key;
use crate::network::BtcNetwork;
use crate::utxo::UtxoSelection;

/// How the sender's coins are locked, and therefore how inputs are signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendScript {
    /// Legacy pay-to-pubkey-hash; scriptSig carries `<sig> <pubkey>`.
    #[default]
    P2pkh,
    /// Native SegWit v0; witness carries `[sig, pubkey]`. Needs a compressed key.
    P2wpkh,
}

/// An unsigned Bitcoin transaction ready for signing.
#[derive(Debug, Clone)]
pub struct UnsignedBtcTx {
    /// The bitcoin transaction with empty scriptSigs and witnesses.
    pub tx: Transaction,
    /// The outputs being spent (in the same order as the transaction inputs).
    /// Needed for computing sighashes during signing.
    pub prevouts: Vec<TxOut>,
    /// Fee paid, exactly as requested.
    pub fee_sat: u64,
    /// Value returned to the sender; zero means no change output.
    pub change_sat: u64,
}

/// Address the sender's coins sit at for the given spend type.
pub fn sender_address(
    key: &PrivateKey,
    spend: SpendScript,
    network: BtcNetwork,
) -> Result<Address, BtcError> {
    let pk = public_key(key);
    let net = network.to_bitcoin_network();
    match spend {
        SpendScript::P2pkh => Ok(Address::p2pkh(pk.pubkey_hash(), net)),
        SpendScript::P2wpkh => {
            let compressed = CompressedPublicKey::try_from(pk).map_err(|e| {
                BtcError::InvalidPrivateKey(format!("segwit spending needs a compressed key: {e}"))
            })?;
            Ok(Address::p2wpkh(&compressed, net))
        }
    }
}

/// Build an unsigned transaction paying `amount_sat` to `recipient`.
///
/// Output 0 pays the recipient. If `selection.total_sat - amount_sat - fee_sat`
/// is positive it goes back to `change_address` as output 1; otherwise there
/// is no change output. The fee is whatever the caller asked for, never
/// adjusted.
pub fn build_transaction(
    selection: &UtxoSelection,
    recipient: &str,
    amount_sat: u64,
    fee_sat: u64,
    change_address: &Address,
    network: BtcNetwork,
) -> Result<UnsignedBtcTx, BtcError> {
    if amount_sat == 0 {
        return Err(BtcError::InvalidAmount("amount must be positive".into()));
    }
    let need_sat = amount_sat
        .checked_add(fee_sat)
        .ok_or_else(|| BtcError::InvalidAmount("amount + fee overflows".into()))?;
    let change_sat = selection
        .total_sat
        .checked_sub(need_sat)
        .ok_or(BtcError::InsufficientFunds {
            have: selection.total_sat,
            need: need_sat,
        })?;

    let recipient_addr = parse_address(recipient, network)?;
    let sender_script = change_address.script_pubkey();

    let mut inputs = Vec::with_capacity(selection.selected.len());
    let mut prevouts = Vec::with_capacity(selection.selected.len());

    for utxo in &selection.selected {
        let txid: Txid = utxo
            .txid
            .parse()
            .map_err(|e| BtcError::TransactionBuildError(format!("invalid txid {}: {e}", utxo.txid)))?;

        inputs.push(TxIn {
            previous_output: OutPoint::new(txid, utxo.vout),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::default(),
        });

        prevouts.push(TxOut {
            value: Amount::from_sat(utxo.amount_sat),
            script_pubkey: sender_script.clone(),
        });
    }

    let mut outputs = vec![TxOut {
        value: Amount::from_sat(amount_sat),
        script_pubkey: recipient_addr.script_pubkey(),
    }];
    if change_sat > 0 {
        outputs.push(TxOut {
            value: Amount::from_sat(change_sat),
            script_pubkey: sender_script,
        });
    }

    let tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: inputs,
        output: outputs,
    };

    Ok(UnsignedBtcTx {
        tx,
        prevouts,
        fee_sat,
        change_sat,
    })
}

/// Sign every input of `unsigned_tx` with `key` (SIGHASH_ALL).
///
/// All inputs are assumed to be controlled by the same key and locked with
/// the script type given by `spend`.
pub fn sign_transaction(
    unsigned_tx: &UnsignedBtcTx,
    key: &PrivateKey,
    spend: SpendScript,
) -> Result<Transaction, BtcError> {
    let secp = Secp256k1::new();
    let pubkey = key.public_key(&secp);
    let compressed = match spend {
        SpendScript::P2wpkh => Some(CompressedPublicKey::try_from(pubkey).map_err(|e| {
            BtcError::SigningError(format!("segwit spending needs a compressed key: {e}"))
        })?),
        SpendScript::P2pkh => None,
    };

    let mut signed_tx = unsigned_tx.tx.clone();
    let mut sighash_cache = SighashCache::new(&unsigned_tx.tx);

    for (input_index, prevout) in unsigned_tx.prevouts.iter().enumerate() {
        let digest = match spend {
            SpendScript::P2pkh => sighash_cache
                .legacy_signature_hash(
                    input_index,
                    &prevout.script_pubkey,
                    EcdsaSighashType::All.to_u32(),
                )
                .map_err(|e| BtcError::SigningError(format!("sighash computation failed: {e}")))?
                .to_byte_array(),
            SpendScript::P2wpkh => sighash_cache
                .p2wpkh_signature_hash(
                    input_index,
                    &prevout.script_pubkey,
                    prevout.value,
                    EcdsaSighashType::All,
                )
                .map_err(|e| BtcError::SigningError(format!("sighash computation failed: {e}")))?
                .to_byte_array(),
        };

        let msg = Message::from_digest(digest);
        let signature = secp.sign_ecdsa(&msg, &key.inner);

        // DER signature followed by the sighash type byte.
        let mut sig_bytes = signature.serialize_der().to_vec();
        sig_bytes.push(EcdsaSighashType::All as u8);

        match compressed {
            None => {
                let sig_push = PushBytesBuf::try_from(sig_bytes)
                    .map_err(|e| BtcError::SigningError(format!("signature push failed: {e}")))?;
                signed_tx.input[input_index].script_sig = ScriptBuf::builder()
                    .push_slice(sig_push)
                    .push_key(&pubkey)
                    .into_script();
            }
            Some(ref cpk) => {
                let mut witness = Witness::new();
                witness.push(&sig_bytes);
                witness.push(cpk.to_bytes());
                signed_tx.input[input_index].witness = witness;
            }
        }
    }

    Ok(signed_tx)
}

/// Consensus-serialize a transaction as lowercase hex.
pub fn to_hex(tx: &Transaction) -> String {
    bitcoin::consensus::encode::serialize_hex(tx)
}
