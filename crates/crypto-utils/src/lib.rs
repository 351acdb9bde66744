//! # crypto-utils
//!
//! Secure random generation, zeroizing secret wrappers, and the demo XOR
//! text cipher used by the dashboard's "encryption" panel.

pub mod error;
pub mod random;
pub mod xor;
pub mod zeroizing;

pub use error::CryptoError;
pub use zeroizing::{ZeroizingBytes, ZeroizingString};
