use std::str::FromStr;

use bip39::{Language, Mnemonic};
use crypto_utils::random::random_bytes;
use crypto_utils::{ZeroizingBytes, ZeroizingString};
use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Supported mnemonic lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordCount {
    /// 128 bits of entropy.
    #[default]
    Twelve,
    /// 256 bits of entropy.
    TwentyFour,
}

impl WordCount {
    pub fn words(self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::TwentyFour => 24,
        }
    }

    fn entropy_bytes(self) -> usize {
        match self {
            WordCount::Twelve => 16,
            WordCount::TwentyFour => 32,
        }
    }
}

impl TryFrom<usize> for WordCount {
    type Error = WalletError;

    fn try_from(words: usize) -> Result<Self, Self::Error> {
        match words {
            12 => Ok(WordCount::Twelve),
            24 => Ok(WordCount::TwentyFour),
            n => Err(WalletError::InvalidMnemonic(format!(
                "unsupported word count {n}, expected 12 or 24"
            ))),
        }
    }
}

impl FromStr for WordCount {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: usize = s
            .parse()
            .map_err(|_| WalletError::InvalidMnemonic(format!("not a word count: {s}")))?;
        WordCount::try_from(n)
    }
}

/// Generate a new English BIP-39 mnemonic from OS randomness.
pub fn generate_mnemonic(count: WordCount) -> Result<ZeroizingString, WalletError> {
    let entropy = ZeroizingBytes::new(random_bytes(count.entropy_bytes()));
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(ZeroizingString::new(mnemonic.to_string()))
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase.trim()).is_ok()
}

/// Derive seed bytes from mnemonic + optional passphrase
/// Returns 64-byte seed. Caller MUST zeroize the returned seed when done.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<[u8; 64], WalletError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase.trim())
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(mnemonic.to_seed(passphrase))
}

/// Get the word list for autocomplete
pub fn word_list() -> &'static [&'static str] {
    Language::English.word_list()
}

/// Validate a single word against the BIP-39 word list
pub fn is_valid_word(word: &str) -> bool {
    Language::English.find_word(word).is_some()
}
