//! Public block-explorer access.
//!
//! Thin async clients for the Esplora REST API (mempool.space,
//! blockstream.info) and blockchain.info, the provider traits the rest of
//! the workspace codes against, and an ordered fallback chain for lookups
//! that may be served by more than one provider.

pub mod blockchain_info;
pub mod chain;
pub mod error;
pub mod esplora;
pub mod http;
pub mod provider;
pub mod types;

pub use blockchain_info::BlockchainInfoClient;
pub use chain::FallbackChain;
pub use error::ExplorerError;
pub use esplora::EsploraClient;
pub use http::HttpClient;
pub use provider::{
    BalanceProvider, HistoryProvider, PrevOutputProvider, Provider, RawTxSource, UtxoSource,
};
pub use types::{sat_to_btc, AddressTransaction, TxEndpoint};
