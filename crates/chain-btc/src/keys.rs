use bitcoin::secp256k1::{Secp256k1, SecretKey};
use bitcoin::{PrivateKey, PublicKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::BtcError;
use crate::network::BtcNetwork;

/// The three text encodings of one private key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyEncodings {
    /// WIF for the uncompressed public key (`5...` on mainnet).
    pub wif: String,
    /// WIF with the compression flag (`K...`/`L...` on mainnet).
    pub wif_compressed: String,
    /// Raw 32-byte secret as lowercase hex.
    pub hex: String,
}

/// Encode a 32-byte secret in every supported private key format.
pub fn encode_private_key(secret: &[u8; 32], network: BtcNetwork) -> Result<KeyEncodings, BtcError> {
    let sk = SecretKey::from_slice(secret)
        .map_err(|e| BtcError::InvalidPrivateKey(format!("invalid secret key: {e}")))?;
    let net = network.to_bitcoin_network();

    Ok(KeyEncodings {
        wif: PrivateKey::new_uncompressed(sk, net).to_wif(),
        wif_compressed: PrivateKey::new(sk, net).to_wif(),
        hex: hex::encode(secret),
    })
}

/// Parse a WIF string and check it was encoded for `network`.
///
/// The returned key keeps the WIF compression flag, which decides the
/// public key encoding (and therefore the legacy address) of the sender.
pub fn parse_wif(wif: &str, network: BtcNetwork) -> Result<PrivateKey, BtcError> {
    let key = PrivateKey::from_wif(wif.trim())
        .map_err(|e| BtcError::InvalidPrivateKey(format!("failed to parse WIF: {e}")))?;

    if key.network != network.kind() {
        return Err(BtcError::InvalidNetwork(format!(
            "WIF key is not encoded for {network}"
        )));
    }
    Ok(key)
}

/// Public key matching a parsed WIF key, with the same compression.
pub fn public_key(key: &PrivateKey) -> PublicKey {
    let secp = Secp256k1::signing_only();
    key.public_key(&secp)
}
