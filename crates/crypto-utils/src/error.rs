use thiserror::Error;

/// Errors from the random, secret-handling and cipher helpers.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}
