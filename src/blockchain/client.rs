//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the selected network's JSON-RPC endpoint
//! - Query chain state (chain id, block number)
//! - Bound every request with a timeout

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::config::SelectedNetwork;

/// Default RPC request timeout.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-RPC client for one network.
#[derive(Clone)]
pub struct RpcClient {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: String,
    /// Chain id the network profile declares.
    chain_id: u64,
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a client. No request is made until a query is issued.
    pub fn new(rpc_url: &str, chain_id: u64, timeout_duration: Duration) -> BlockchainResult<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
        let provider = Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            chain_id,
            timeout_duration,
        })
    }

    /// Client for the selected network (the local node when simulated).
    pub fn for_network(network: &SelectedNetwork<'_>, timeout_duration: Duration) -> BlockchainResult<Self> {
        Self::new(network.rpc_url(), network.chain_id(), timeout_duration)
    }

    /// Verify the connected chain ID matches the network profile.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let actual = self.get_chain_id().await?;
        if actual.0 != self.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.chain_id,
                actual: actual.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.call("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.call("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn call<T, F>(&self, method: &'static str, request: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, request).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method, rpc_url = %self.rpc_url, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{} failed: {}", method, e)))
            }
            Err(_) => {
                tracing::warn!(method, rpc_url = %self.rpc_url, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration))
            }
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("timeout_ms", &self.timeout_duration.as_millis())
            .finish()
    }
}
