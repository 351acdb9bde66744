use std::fmt;

use chain_btc::address::{
    pubkey_to_p2pkh_address, pubkey_to_p2sh_p2wpkh_address, pubkey_to_p2wpkh_address,
};
use chain_btc::keys::encode_private_key;
use chain_btc::network::BtcNetwork;
use serde::Serialize;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WalletError;
use crate::hd_derivation::{derive_key, root_extended_keys};
use crate::mnemonic::{generate_mnemonic, mnemonic_to_seed, validate_mnemonic, WordCount};

/// Every encoding of the one account a wallet exposes.
///
/// Holds secrets in plain strings so it can be printed and exported; all of
/// them are wiped when the record is dropped.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct BitcoinWallet {
    pub mnemonic: String,
    #[zeroize(skip)]
    pub network: BtcNetwork,
    pub derivation_path: String,
    /// Native SegWit (P2WPKH) address.
    pub bech32_address: String,
    /// Legacy P2PKH address of the compressed public key.
    pub legacy_address: String,
    /// P2SH-wrapped P2WPKH address.
    pub p2sh_address: String,
    pub wif: String,
    pub wif_compressed: String,
    pub private_key_hex: String,
    /// Uncompressed SEC1 public key, hex.
    pub public_key: String,
    pub public_key_compressed: String,
    /// Root extended private key.
    pub xprv: String,
    /// Root extended public key.
    pub xpub: String,
}

impl fmt::Debug for BitcoinWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitcoinWallet")
            .field("network", &self.network)
            .field("derivation_path", &self.derivation_path)
            .field("bech32_address", &self.bech32_address)
            .field("legacy_address", &self.legacy_address)
            .field("p2sh_address", &self.p2sh_address)
            .field("public_key_compressed", &self.public_key_compressed)
            .field("xpub", &self.xpub)
            .finish_non_exhaustive()
    }
}

/// Create a wallet from a fresh mnemonic.
pub fn generate_wallet(network: BtcNetwork, words: WordCount) -> Result<BitcoinWallet, WalletError> {
    let phrase = generate_mnemonic(words)?;
    let wallet = build_wallet(&phrase, "", network)?;
    info!(%network, address = %wallet.bech32_address, "generated wallet");
    Ok(wallet)
}

/// Rebuild a wallet from an existing mnemonic. Deterministic for a given
/// phrase, passphrase and network.
pub fn wallet_from_mnemonic(
    phrase: &str,
    passphrase: &str,
    network: BtcNetwork,
) -> Result<BitcoinWallet, WalletError> {
    if !validate_mnemonic(phrase) {
        return Err(WalletError::InvalidMnemonic("Invalid mnemonic phrase".into()));
    }
    let wallet = build_wallet(phrase, passphrase, network)?;
    info!(%network, address = %wallet.bech32_address, "restored wallet");
    Ok(wallet)
}

fn build_wallet(
    phrase: &str,
    passphrase: &str,
    network: BtcNetwork,
) -> Result<BitcoinWallet, WalletError> {
    let mut seed = mnemonic_to_seed(phrase, passphrase)?;
    let result = wallet_from_seed(&seed, phrase, network);
    seed.zeroize();
    result
}

fn wallet_from_seed(
    seed: &[u8],
    phrase: &str,
    network: BtcNetwork,
) -> Result<BitcoinWallet, WalletError> {
    let key = derive_key(seed, network)?;
    let root = root_extended_keys(seed, network)?;
    let encodings = encode_private_key(&key.private_key, network)?;

    Ok(BitcoinWallet {
        mnemonic: phrase.split_whitespace().collect::<Vec<_>>().join(" "),
        network,
        derivation_path: key.derivation_path.clone(),
        bech32_address: pubkey_to_p2wpkh_address(&key.public_key_compressed, network)?,
        legacy_address: pubkey_to_p2pkh_address(&key.public_key_compressed, network)?,
        p2sh_address: pubkey_to_p2sh_p2wpkh_address(&key.public_key_compressed, network)?,
        wif: encodings.wif.clone(),
        wif_compressed: encodings.wif_compressed.clone(),
        private_key_hex: encodings.hex.clone(),
        public_key: hex::encode(key.public_key_uncompressed),
        public_key_compressed: hex::encode(key.public_key_compressed),
        xprv: root.xprv.to_string(),
        xpub: root.xpub.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn restores_known_mainnet_wallet() {
        let w = wallet_from_mnemonic(TEST_MNEMONIC, "", BtcNetwork::Mainnet).unwrap();
        assert_eq!(w.derivation_path, "m/44'/0'/0'/0/0");
        assert_eq!(w.legacy_address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
        assert_eq!(w.p2sh_address, "3HkzTaFbEMWeJPLyNCNhPyGfZsVLDwdD3G");
        assert_eq!(w.bech32_address, "bc1qmxrw6qdh5g3ztfcwm0et5l8mvws4eva24kmp8m");
        assert_eq!(w.wif, "5KY3dHRWNnFkBJaTnmUTaR1oqs9tU9goQbG19FSNLSo5oAxLokG");
        assert_eq!(
            w.wif_compressed,
            "L4p2b9VAf8k5aUahF1JCJUzZkgNEAqLfq8DDdQiyAprQAKSbu8hf"
        );
        assert_eq!(
            w.private_key_hex,
            "e284129cc0922579a535bbf4d1a3b25773090d28c909bc0fed73b5e0222cc372"
        );
        assert_eq!(
            w.public_key_compressed,
            "03aaeb52dd7494c361049de67cc680e83ebcbbbdbeb13637d92cd845f70308af5e"
        );
        assert_eq!(w.public_key.len(), 130);
        assert!(w.public_key.starts_with("04"));
        assert!(w.xprv.starts_with("xprv9s21ZrQH143K3GJpoapnV8SFfukcVBSfeCficPSGfubmSFDxo1kuHnLisriDvSnRRuL2Qrg5ggqHKNVpxR86QEC8w35uxmGoggxtQTPvfUu"));
        assert!(w.xpub.starts_with("xpub661MyMwAqRbc"));
    }

    #[test]
    fn restores_known_testnet_wallet() {
        let w = wallet_from_mnemonic(TEST_MNEMONIC, "", BtcNetwork::Testnet).unwrap();
        assert_eq!(w.derivation_path, "m/44'/1'/0'/0/0");
        assert_eq!(w.legacy_address, "mkpZhYtJu2r87Js3pDiWJDmPte2NRZ8bJV");
        assert_eq!(w.p2sh_address, "2Mx2s2Km1FYqHBWRYcf8bjKQs2KArGcD8um");
        assert_eq!(w.bech32_address, "tb1q8gk5z3dy7zv9ywe7synlrk58elz4hrne29cpdj");
        assert_eq!(
            w.wif_compressed,
            "cV6NTLu255SZ5iCNkVHezNGDH5qv6CanJpgBPqYgJU13NNKJhRs1"
        );
        assert!(w.xprv.starts_with("tprv"));
    }

    #[test]
    fn restore_is_deterministic() {
        let a = wallet_from_mnemonic(TEST_MNEMONIC, "", BtcNetwork::Mainnet).unwrap();
        let b = wallet_from_mnemonic(TEST_MNEMONIC, "", BtcNetwork::Mainnet).unwrap();
        assert_eq!(a.bech32_address, b.bech32_address);
        assert_eq!(a.wif, b.wif);
        assert_eq!(a.xprv, b.xprv);
    }

    #[test]
    fn passphrase_gives_different_wallet() {
        let a = wallet_from_mnemonic(TEST_MNEMONIC, "", BtcNetwork::Mainnet).unwrap();
        let b = wallet_from_mnemonic(TEST_MNEMONIC, "TREZOR", BtcNetwork::Mainnet).unwrap();
        assert_ne!(a.bech32_address, b.bech32_address);
    }

    #[test]
    fn mnemonic_whitespace_normalised() {
        let messy = format!("  {}  ", TEST_MNEMONIC.replace(' ', "   "));
        let w = wallet_from_mnemonic(&messy, "", BtcNetwork::Mainnet).unwrap();
        assert_eq!(w.mnemonic, TEST_MNEMONIC);
        assert_eq!(w.legacy_address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
    }

    #[test]
    fn invalid_mnemonic_rejected() {
        assert!(matches!(
            wallet_from_mnemonic("abandon abandon", "", BtcNetwork::Mainnet),
            Err(WalletError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn generated_wallet_is_consistent() {
        let w = generate_wallet(BtcNetwork::Mainnet, WordCount::Twelve).unwrap();
        assert_eq!(w.mnemonic.split_whitespace().count(), 12);
        assert!(w.bech32_address.starts_with("bc1q"));
        assert!(w.legacy_address.starts_with('1'));
        assert!(w.p2sh_address.starts_with('3'));

        let restored = wallet_from_mnemonic(&w.mnemonic, "", BtcNetwork::Mainnet).unwrap();
        assert_eq!(restored.bech32_address, w.bech32_address);
    }

    #[test]
    fn debug_hides_secrets() {
        let w = wallet_from_mnemonic(TEST_MNEMONIC, "", BtcNetwork::Mainnet).unwrap();
        let dbg = format!("{w:?}");
        assert!(dbg.contains("bc1qmxrw6qdh5g3ztfcwm0et5l8mvws4eva24kmp8m"));
        assert!(!dbg.contains("abandon"));
        assert!(!dbg.contains(&w.wif_compressed));
        assert!(!dbg.contains("xprv"));
    }
}
