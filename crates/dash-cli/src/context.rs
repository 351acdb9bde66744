use std::sync::Arc;

use anyhow::{Context as _, Result};
use chain_btc::network::BtcNetwork;
use explorer::{
    BalanceProvider, BlockchainInfoClient, EsploraClient, FallbackChain, HttpClient,
    PrevOutputProvider,
};

use crate::config::Settings;

/// Resolved settings plus the explorer clients built from them.
pub struct AppContext {
    pub settings: Settings,
    pub json: bool,
    http: HttpClient,
}

impl AppContext {
    pub fn new(settings: Settings, json: bool) -> Result<Self> {
        let http = HttpClient::new(settings.timeout).context("failed to build HTTP client")?;
        Ok(Self {
            settings,
            json,
            http,
        })
    }

    pub fn network(&self) -> BtcNetwork {
        self.settings.network
    }

    pub fn esplora(&self) -> EsploraClient {
        EsploraClient::new(self.http.clone(), self.settings.esplora_url.clone())
    }

    /// blockchain.info only serves mainnet.
    pub fn blockchain_info(&self) -> Option<BlockchainInfoClient> {
        (self.network() == BtcNetwork::Mainnet).then(|| {
            BlockchainInfoClient::new(self.http.clone(), self.settings.blockchain_info_url.clone())
        })
    }

    /// blockchain.info first, Esplora second.
    pub fn balance_chain(&self) -> FallbackChain<dyn BalanceProvider> {
        let mut chain: FallbackChain<dyn BalanceProvider> = FallbackChain::default();
        if let Some(client) = self.blockchain_info() {
            chain.push(Arc::new(client));
        }
        chain.push(Arc::new(self.esplora()));
        chain
    }

    /// Esplora (address UTXOs, then the transaction) first, blockchain.info second.
    pub fn prev_output_chain(&self) -> FallbackChain<dyn PrevOutputProvider> {
        let mut chain: FallbackChain<dyn PrevOutputProvider> = FallbackChain::default();
        chain.push(Arc::new(self.esplora()));
        if let Some(client) = self.blockchain_info() {
            chain.push(Arc::new(client));
        }
        chain
    }
}
