use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{ExplorerError, ProviderFailure};
use crate::provider::{BalanceProvider, PrevOutputProvider, Provider};

/// Ordered list of providers tried one after another until one succeeds.
///
/// Order is priority: the first provider that answers wins and the rest are
/// never contacted. When every provider fails, the returned
/// [`ExplorerError::AllProvidersFailed`] carries each provider's error.
pub struct FallbackChain<P: ?Sized + Provider> {
    providers: Vec<Arc<P>>,
}

impl<P: ?Sized + Provider> Default for FallbackChain<P> {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
        }
    }
}

impl<P: ?Sized + Provider> FallbackChain<P> {
    pub fn new(providers: Vec<Arc<P>>) -> Self {
        Self { providers }
    }

    /// Append a provider with the lowest priority so far.
    pub fn push(&mut self, provider: Arc<P>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Run `attempt` against each provider in order and return the first
    /// successful result.
    pub async fn first_success<T, F, Fut>(
        &self,
        operation: &str,
        mut attempt: F,
    ) -> Result<T, ExplorerError>
    where
        F: FnMut(Arc<P>) -> Fut,
        Fut: Future<Output = Result<T, ExplorerError>>,
    {
        if self.providers.is_empty() {
            return Err(ExplorerError::NoProviders(operation.to_string()));
        }

        let mut failures = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let name = provider.name().to_string();
            match attempt(Arc::clone(provider)).await {
                Ok(value) => {
                    debug!(provider = %name, operation, "provider answered");
                    return Ok(value);
                }
                Err(e) => {
                    warn!(provider = %name, operation, error = %e, "provider failed, trying next");
                    failures.push(ProviderFailure {
                        provider: name,
                        error: e.to_string(),
                    });
                }
            }
        }

        Err(ExplorerError::AllProvidersFailed {
            operation: operation.to_string(),
            failures,
        })
    }
}

impl FallbackChain<dyn BalanceProvider> {
    /// Balance of `address` in satoshis from the first provider that answers.
    pub async fn balance(&self, address: &str) -> Result<u64, ExplorerError> {
        self.first_success("balance", |p| async move { p.fetch_balance(address).await })
            .await
    }
}

impl FallbackChain<dyn PrevOutputProvider> {
    /// Value of a previous output from the first provider that answers.
    pub async fn prev_output_value(
        &self,
        txid: &str,
        vout: u32,
        address: Option<&str>,
    ) -> Result<u64, ExplorerError> {
        self.first_success("previous output value", |p| async move {
            p.prev_output_value(txid, vout, address).await
        })
        .await
    }
}
