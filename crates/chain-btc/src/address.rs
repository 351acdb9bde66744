use bitcoin::address::{Address, NetworkUnchecked};
use bitcoin::{CompressedPublicKey, PublicKey, Script};
use serde::{Deserialize, Serialize};

use crate::error::BtcError;
use crate::network::BtcNetwork;

/// Derive a P2WPKH (native SegWit bech32) address from a compressed public key.
///
/// Takes a 33-byte compressed secp256k1 public key and returns a bech32 address
/// string: `bc1...` for mainnet, `tb1...` for testnet/signet.
pub fn pubkey_to_p2wpkh_address(
    pubkey_bytes: &[u8; 33],
    network: BtcNetwork,
) -> Result<String, BtcError> {
    let compressed_pk = parse_compressed(pubkey_bytes)?;
    let address = Address::p2wpkh(&compressed_pk, network.to_bitcoin_network());
    Ok(address.to_string())
}

/// Derive a legacy P2PKH address (`1...` / `m...`, `n...`).
///
/// Accepts either a 33-byte compressed or a 65-byte uncompressed key; the
/// two encodings hash to different addresses.
pub fn pubkey_to_p2pkh_address(pubkey_bytes: &[u8], network: BtcNetwork) -> Result<String, BtcError> {
    let pk = PublicKey::from_slice(pubkey_bytes)
        .map_err(|e| BtcError::InvalidPublicKey(format!("failed to parse public key: {e}")))?;
    let address = Address::p2pkh(pk.pubkey_hash(), network.to_bitcoin_network());
    Ok(address.to_string())
}

/// Derive a P2SH-wrapped P2WPKH address (`3...` / `2...`).
pub fn pubkey_to_p2sh_p2wpkh_address(
    pubkey_bytes: &[u8; 33],
    network: BtcNetwork,
) -> Result<String, BtcError> {
    let compressed_pk = parse_compressed(pubkey_bytes)?;
    let address = Address::p2shwpkh(&compressed_pk, network.to_bitcoin_network());
    Ok(address.to_string())
}

fn parse_compressed(pubkey_bytes: &[u8; 33]) -> Result<CompressedPublicKey, BtcError> {
    CompressedPublicKey::from_slice(pubkey_bytes).map_err(|e| {
        BtcError::InvalidPublicKey(format!("failed to parse compressed public key: {e}"))
    })
}

/// Parse an address string and require that it belongs to `network`.
pub fn parse_address(address: &str, network: BtcNetwork) -> Result<Address, BtcError> {
    address
        .trim()
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| BtcError::InvalidAddress(format!("failed to parse address: {e}")))?
        .require_network(network.to_bitcoin_network())
        .map_err(|e| BtcError::InvalidAddress(format!("address is for another network: {e}")))
}

/// Validate a Bitcoin address string for the given network.
///
/// Supports P2PKH, P2SH, P2WPKH, P2WSH, and P2TR address formats.
/// Returns `true` only if the address parses and belongs to `network`.
/// Use [`parse_address`] to learn why an address was rejected.
pub fn validate_address(address: &str, network: BtcNetwork) -> bool {
    address
        .trim()
        .parse::<Address<NetworkUnchecked>>()
        .is_ok_and(|parsed| parsed.is_valid_for_network(network.to_bitcoin_network()))
}

/// Locking-script templates that can be turned back into an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptTemplate {
    P2pkh,
    P2wpkh,
    P2sh,
}

impl ScriptTemplate {
    /// Order in which templates are tried when recovering an address.
    pub const RECOVERY_ORDER: [ScriptTemplate; 3] =
        [ScriptTemplate::P2pkh, ScriptTemplate::P2wpkh, ScriptTemplate::P2sh];

    pub fn matches(self, script: &Script) -> bool {
        match self {
            ScriptTemplate::P2pkh => script.is_p2pkh(),
            ScriptTemplate::P2wpkh => script.is_p2wpkh(),
            ScriptTemplate::P2sh => script.is_p2sh(),
        }
    }
}

impl std::fmt::Display for ScriptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptTemplate::P2pkh => write!(f, "p2pkh"),
            ScriptTemplate::P2wpkh => write!(f, "p2wpkh"),
            ScriptTemplate::P2sh => write!(f, "p2sh"),
        }
    }
}

/// An address recovered from a locking script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveredAddress {
    pub template: ScriptTemplate,
    pub address: String,
}

/// Best-effort address recovery from a `scriptPubKey`.
///
/// Tries P2PKH, then P2WPKH, then P2SH and returns the first match. Any
/// other script (P2PK, multisig, OP_RETURN, taproot...) yields `None`.
pub fn address_from_script(script: &Script, network: BtcNetwork) -> Option<RecoveredAddress> {
    let template = ScriptTemplate::RECOVERY_ORDER
        .into_iter()
        .find(|t| t.matches(script))?;

    Address::from_script(script, network.to_bitcoin_network())
        .ok()
        .map(|addr| RecoveredAddress {
            template,
            address: addr.to_string(),
        })
}
