use thiserror::Error;

/// One failed attempt inside a [`crate::FallbackChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: String,
}

/// Block-explorer access errors.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("output {vout} not found in transaction {txid}")]
    OutputNotFound { txid: String, vout: u32 },

    #[error("address {0} not present in response")]
    AddressNotFound(String),

    #[error("no providers configured for {0}")]
    NoProviders(String),

    #[error("all providers failed for {operation}: {}", format_failures(.failures))]
    AllProvidersFailed {
        operation: String,
        failures: Vec<ProviderFailure>,
    },

    #[error("invalid client configuration: {0}")]
    Config(String),
}

fn format_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.provider, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}
