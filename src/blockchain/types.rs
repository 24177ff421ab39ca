//! Chain-specific types and error definitions.

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Connected node reports a different chain than the profile declares.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Named account could not be resolved from the configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(80001u64);
        assert_eq!(chain_id.0, 80001);
        assert_eq!(u64::from(chain_id), 80001);
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "RPC timeout after 10000 ms");

        let err = BlockchainError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "RPC timeout after 250 ms");

        let err = BlockchainError::ChainMismatch {
            expected: 4,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Chain ID mismatch: expected 4, got 1");

        let err = BlockchainError::from(ConfigError::UnknownRole("treasury".into()));
        assert_eq!(err.to_string(), "unknown named account 'treasury'");
    }
}
