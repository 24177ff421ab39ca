//! Signer derivation for named accounts.
//!
//! # Security
//! - Private keys come only from resolved configuration secrets
//! - Keys are never logged or serialized

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::{ConfigError, SelectedNetwork, ToolConfig};

/// Development keys the local simulated node funds by default.
pub const DEV_PRIVATE_KEYS: [&str; 3] = [
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
];

/// A signer bound to one chain.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    /// Chain ID for EIP-155 replay protection.
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key (with or without 0x prefix).
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        let key_hex = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);

        // The parse error never echoes the key.
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), chain_id, "Wallet initialized");

        Ok(Self { signer, chain_id })
    }

    /// Development account `index` of the local simulated node.
    pub fn dev_account(index: u32, chain_id: u64) -> BlockchainResult<Self> {
        let key = DEV_PRIVATE_KEYS.get(index as usize).ok_or_else(|| {
            BlockchainError::Wallet(format!(
                "no development account at index {} ({} available)",
                index,
                DEV_PRIVATE_KEYS.len()
            ))
        })?;
        Self::from_private_key(key, chain_id)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

/// Resolve the signer for `role` on the selected network.
///
/// Uses `named_accounts[role][chain_id]` as an index into the network's
/// account secrets; the simulated network falls back to development keys.
pub fn named_account(
    config: &ToolConfig,
    network: &SelectedNetwork<'_>,
    role: &str,
) -> BlockchainResult<Wallet> {
    let chain_id = network.chain_id();
    let index = config.account_index(role, chain_id)?;

    match network.account(role, index)? {
        Some(secret) => Wallet::from_private_key(secret.expose(), chain_id),
        None if network.is_simulated() => Wallet::dev_account(index, chain_id),
        None => Err(ConfigError::MissingSecret {
            network: network.name.to_string(),
            vars: network.profile.accounts_env.join(", "),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, MapEnv};

    const TEST_PRIVATE_KEY: &str = DEV_PRIVATE_KEYS[0];
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 1).unwrap();
        assert_eq!(wallet.address().to_string().to_lowercase(), TEST_ADDRESS);
        assert_eq!(wallet.chain_id(), 1);
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = Wallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY), 1).unwrap();
        assert_eq!(wallet.address().to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("invalid_key", 1);
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_dev_accounts() {
        let second = Wallet::dev_account(1, 31337).unwrap();
        assert_eq!(
            second.address().to_string().to_lowercase(),
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
        assert!(Wallet::dev_account(3, 31337).is_err());
    }

    #[test]
    fn test_named_account_simulated() {
        let config = ToolConfig::default();
        let network = config.select_network(None).unwrap();
        let deployer = named_account(&config, &network, "deployer").unwrap();
        assert_eq!(deployer.address().to_string().to_lowercase(), TEST_ADDRESS);
        assert_eq!(deployer.chain_id(), 31337);
    }

    #[test]
    fn test_named_account_remote() {
        let key = DEV_PRIVATE_KEYS[2];
        let env = MapEnv::new().with("PRIVATE_KEY", format!("0x{}", key));
        let config = ConfigLoader::load_str("", &env).unwrap();
        let network = config.select_network(Some("rinkeby")).unwrap();

        let deployer = named_account(&config, &network, "deployer").unwrap();
        assert_eq!(
            deployer.address().to_string().to_lowercase(),
            "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc"
        );
        assert_eq!(deployer.chain_id(), 4);
    }

    #[test]
    fn test_named_account_unknown_role() {
        let config = ToolConfig::default();
        let network = config.select_network(None).unwrap();
        let err = named_account(&config, &network, "treasury").unwrap_err();
        assert!(matches!(err, BlockchainError::Config(ConfigError::UnknownRole(_))));
    }
}
