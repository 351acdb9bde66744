use bip32::{DerivationPath, Prefix, XPrv};
use chain_btc::network::BtcNetwork;
use crypto_utils::ZeroizingString;
use k256::ecdsa::SigningKey;
use zeroize::Zeroize;

use crate::error::WalletError;

/// BIP-44 path of the single account the dashboard works with:
/// m/44'/coin_type'/0'/0/0, coin type 0 on mainnet and 1 elsewhere.
pub fn derivation_path(network: BtcNetwork) -> String {
    format!("m/44'/{}'/0'/0/0", network.coin_type())
}

/// Derive the dashboard key for `network` from a BIP-39 seed.
pub fn derive_key(seed: &[u8], network: BtcNetwork) -> Result<DerivedKey, WalletError> {
    let path_str = derivation_path(network);

    let path: DerivationPath = path_str
        .parse()
        .map_err(|e: bip32::Error| WalletError::DerivationFailed(e.to_string()))?;

    let xprv = XPrv::derive_from_path(seed, &path)
        .map_err(|e| WalletError::DerivationFailed(e.to_string()))?;

    let mut private_key_bytes: [u8; 32] = xprv.to_bytes();
    let signing_key = SigningKey::from_bytes(&private_key_bytes.into())
        .map_err(|e| WalletError::DerivationFailed(e.to_string()));
    let signing_key = match signing_key {
        Ok(key) => key,
        Err(e) => {
            private_key_bytes.zeroize();
            return Err(e);
        }
    };

    let verifying_key = signing_key.verifying_key();
    let public_key_compressed: [u8; 33] = verifying_key
        .to_encoded_point(true)
        .as_bytes()
        .try_into()
        .map_err(|_| WalletError::DerivationFailed("Invalid public key length".into()))?;

    let public_key_uncompressed: [u8; 65] = verifying_key
        .to_encoded_point(false)
        .as_bytes()
        .try_into()
        .map_err(|_| WalletError::DerivationFailed("Invalid uncompressed public key".into()))?;

    Ok(DerivedKey {
        private_key: private_key_bytes,
        public_key_compressed,
        public_key_uncompressed,
        derivation_path: path_str,
    })
}

/// Extended keys of the BIP-32 root node (not of the derived account).
///
/// Mainnet uses the `xprv`/`xpub` version bytes, every test network
/// `tprv`/`tpub`.
pub fn root_extended_keys(seed: &[u8], network: BtcNetwork) -> Result<RootKeys, WalletError> {
    let root = XPrv::new(seed).map_err(|e| WalletError::DerivationFailed(e.to_string()))?;
    let (private_prefix, public_prefix) = match network {
        BtcNetwork::Mainnet => (Prefix::XPRV, Prefix::XPUB),
        BtcNetwork::Testnet | BtcNetwork::Signet => (Prefix::TPRV, Prefix::TPUB),
    };

    let xprv = ZeroizingString::new(root.to_string(private_prefix).as_str().to_owned());
    let xpub = root.public_key().to_string(public_prefix);
    Ok(RootKeys { xprv, xpub })
}

/// Derived secp256k1 key
pub struct DerivedKey {
    pub private_key: [u8; 32],
    pub public_key_compressed: [u8; 33],
    pub public_key_uncompressed: [u8; 65],
    pub derivation_path: String,
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

pub struct RootKeys {
    pub xprv: ZeroizingString,
    pub xpub: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    // BIP-39 test vector: "abandon" x11 + "about"
    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn test_seed() -> [u8; 64] {
        use crate::mnemonic::mnemonic_to_seed;
        mnemonic_to_seed(TEST_MNEMONIC, "").unwrap()
    }

    #[test]
    fn test_paths_per_network() {
        assert_eq!(derivation_path(BtcNetwork::Mainnet), "m/44'/0'/0'/0/0");
        assert_eq!(derivation_path(BtcNetwork::Testnet), "m/44'/1'/0'/0/0");
        assert_eq!(derivation_path(BtcNetwork::Signet), "m/44'/1'/0'/0/0");
    }

    #[test]
    fn test_derive_mainnet_key() {
        let key = derive_key(&test_seed(), BtcNetwork::Mainnet).unwrap();
        assert_eq!(key.derivation_path, "m/44'/0'/0'/0/0");
        assert_eq!(
            hex::encode(key.private_key),
            "e284129cc0922579a535bbf4d1a3b25773090d28c909bc0fed73b5e0222cc372"
        );
        assert_eq!(
            hex::encode(key.public_key_compressed),
            "03aaeb52dd7494c361049de67cc680e83ebcbbbdbeb13637d92cd845f70308af5e"
        );
        assert_eq!(key.public_key_uncompressed[0], 0x04);
        assert_eq!(
            key.public_key_uncompressed[1..33],
            key.public_key_compressed[1..]
        );
    }

    #[test]
    fn test_derivation_deterministic() {
        let seed = test_seed();
        let key1 = derive_key(&seed, BtcNetwork::Mainnet).unwrap();
        let key2 = derive_key(&seed, BtcNetwork::Mainnet).unwrap();
        assert_eq!(key1.private_key, key2.private_key);
        assert_eq!(key1.public_key_compressed, key2.public_key_compressed);
    }

    #[test]
    fn test_testnet_uses_other_coin_type() {
        let seed = test_seed();
        let main = derive_key(&seed, BtcNetwork::Mainnet).unwrap();
        let test = derive_key(&seed, BtcNetwork::Testnet).unwrap();
        assert_ne!(main.private_key, test.private_key);
    }

    #[test]
    fn test_root_keys_mainnet() {
        let keys = root_extended_keys(&test_seed(), BtcNetwork::Mainnet).unwrap();
        assert_eq!(
            &*keys.xprv,
            "xprv9s21ZrQH143K3GJpoapnV8SFfukcVBSfeCficPSGfubmSFDxo1kuHnLisriDvSnRRuL2Qrg5ggqHKNVpxR86QEC8w35uxmGoggxtQTPvfUu"
        );
        assert_eq!(
            keys.xpub,
            "xpub661MyMwAqRbcFkPHucMnrGNzDwb6teAX1RbKQmqtEF8kK3Z7LZ59qafCjB9eCRLiTVG3uxBxgKvRgbubRhqSKXnGGb1aoaqLrpMBDrVxga8"
        );
    }

    #[test]
    fn test_root_keys_testnet_prefixes() {
        let keys = root_extended_keys(&test_seed(), BtcNetwork::Testnet).unwrap();
        assert_eq!(
            &*keys.xprv,
            "tprv8ZgxMBicQKsPe5YMU9gHen4Ez3ApihUfykaqUorj9t6FDqy3nP6eoXiAo2ssvpAjoLroQxHqr3R5nE3a5dU3DHTjTgJDd7zrbniJr6nrCzd"
        );
        assert!(keys.xpub.starts_with("tpub"));
    }

    #[test]
    fn test_short_seed_rejected() {
        assert!(matches!(
            root_extended_keys(&[0u8; 8], BtcNetwork::Mainnet),
            Err(WalletError::DerivationFailed(_))
        ));
    }
}
