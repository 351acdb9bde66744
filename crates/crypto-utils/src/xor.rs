//! Repeating-key XOR over UTF-8 text with a base64 transport encoding.
//!
//! This is a demonstration cipher. It provides no confidentiality against
//! anyone who can see more than a few ciphertexts, and must not be used to
//! protect keys or other real secrets.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CryptoError;
use crate::random::random_bytes_fixed;

/// Number of random bytes behind a generated key (hex-encoded to 32 chars).
pub const KEY_BYTES: usize = 16;

/// Generate a fresh key: 16 random bytes rendered as 32 lowercase hex chars.
///
/// The key is used as text, so each hex character contributes one byte to
/// the XOR stream.
pub fn generate_key() -> String {
    hex::encode(random_bytes_fixed::<KEY_BYTES>())
}

/// XOR `text` with `key` and return the result as standard padded base64.
pub fn encrypt(text: &str, key: &str) -> Result<String, CryptoError> {
    check_inputs(text, key)?;
    let mixed = xor_with_key(text.as_bytes(), key.as_bytes());
    Ok(STANDARD.encode(mixed))
}

/// Reverse [`encrypt`]: base64-decode `encoded` and XOR it with `key`.
pub fn decrypt(encoded: &str, key: &str) -> Result<String, CryptoError> {
    let encoded = encoded.trim();
    check_inputs(encoded, key)?;
    let raw = STANDARD
        .decode(encoded)
        .map_err(|e| CryptoError::InvalidEncoding(format!("ciphertext is not base64: {e}")))?;
    let plain = xor_with_key(&raw, key.as_bytes());
    String::from_utf8(plain).map_err(|_| {
        CryptoError::InvalidInput("decrypted bytes are not valid UTF-8 (wrong key?)".into())
    })
}

fn check_inputs(text: &str, key: &str) -> Result<(), CryptoError> {
    if text.is_empty() {
        return Err(CryptoError::InvalidInput("text is empty".into()));
    }
    if key.is_empty() {
        return Err(CryptoError::InvalidInput("key is empty".into()));
    }
    Ok(())
}

fn xor_with_key(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(key.iter().cycle())
        .map(|(d, k)| d ^ k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ciphertext() {
        // 'h'^'k' = 0x03, 'i'^'e' = 0x0c
        assert_eq!(encrypt("hi", "ke").unwrap(), STANDARD.encode([0x03, 0x0c]));
    }

    #[test]
    fn key_repeats_over_longer_text() {
        let encoded = encrypt("aaaa", "ab").unwrap();
        let raw = STANDARD.decode(encoded).unwrap();
        assert_eq!(raw, vec![0x00, 0x03, 0x00, 0x03]);
    }

    #[test]
    fn decrypt_reverses_encrypt() {
        let key = generate_key();
        let text = "send 0.5 BTC to cold storage ✓";
        let encoded = encrypt(text, &key).unwrap();
        assert_ne!(encoded, text);
        assert_eq!(decrypt(&encoded, &key).unwrap(), text);
    }

    #[test]
    fn generated_key_is_32_hex_chars() {
        let key = generate_key();
        assert_eq!(key.len(), KEY_BYTES * 2);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn empty_text_rejected() {
        assert!(matches!(encrypt("", "k"), Err(CryptoError::InvalidInput(_))));
    }

    #[test]
    fn empty_key_rejected() {
        assert!(matches!(encrypt("text", ""), Err(CryptoError::InvalidInput(_))));
        assert!(matches!(decrypt("dGV4dA==", ""), Err(CryptoError::InvalidInput(_))));
    }

    #[test]
    fn whitespace_only_ciphertext_rejected() {
        assert!(matches!(decrypt("   \n", "key"), Err(CryptoError::InvalidInput(_))));
    }

    #[test]
    fn bad_base64_rejected() {
        assert!(matches!(
            decrypt("not base64!!", "key"),
            Err(CryptoError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn non_utf8_plaintext_rejected() {
        // 0xff is never valid as a standalone UTF-8 byte.
        let encoded = STANDARD.encode([0xff ^ b'k']);
        assert!(matches!(
            decrypt(&encoded, "k"),
            Err(CryptoError::InvalidInput(_))
        ));
    }
}
