//! Bitcoin chain support for the dashboard toolkit.
//!
//! Address encodings (bech32, legacy, P2SH-wrapped SegWit), WIF keys,
//! first-fit UTXO selection, transaction building and signing, and
//! decoding raw transactions into a readable view.

pub mod address;
pub mod decode;
pub mod error;
pub mod keys;
pub mod network;
pub mod transaction;
pub mod utxo;
