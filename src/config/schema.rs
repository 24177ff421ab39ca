//! Configuration schema definitions.
//!
//! This module defines the complete toolchain configuration record.
//! All types derive Serde traits for deserialization from `chainrig.toml`.
//! Resolved secrets are `#[serde(skip)]` and never serialize.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::secret::Secret;

/// Environment variable holding the signing key for remote networks.
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// Environment variable holding the contract-verification API key.
pub const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";

/// Environment variable conventionally holding the market-data API key.
pub const CMC_API_KEY_ENV_VAR: &str = "CMC_API_KEY";

/// Root configuration for the toolchain.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Network used when no override is given.
    pub default_network: String,

    /// Network profiles by name.
    pub networks: BTreeMap<String, NetworkProfile>,

    /// Solidity compiler settings.
    pub compiler: CompilerConfig,

    /// Contract verification settings.
    pub verification: VerificationConfig,

    /// Gas usage report settings.
    pub gas_reporter: GasReporterConfig,

    /// Role name -> (chain id -> account index).
    #[serde(with = "chain_keyed")]
    pub named_accounts: BTreeMap<String, BTreeMap<u64, u32>>,

    /// Plugins the runner loads, by package name.
    pub plugins: Vec<String>,

    /// Custom tasks registered by name.
    pub tasks: Vec<String>,
}

/// A named blockchain endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NetworkProfile {
    /// JSON-RPC endpoint. Absent for the local simulated network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Environment variable that overrides `rpc_url` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url_env: Option<String>,

    /// Environment variables holding the account secrets, in order.
    #[serde(default)]
    pub accounts_env: Vec<String>,

    /// Account secrets resolved at load time, one slot per `accounts_env`
    /// entry. An unset variable leaves its slot empty so indexes never shift.
    #[serde(skip)]
    pub accounts: Vec<Option<Secret>>,

    /// EIP-155 chain id.
    pub chain_id: u64,

    /// Blocks to wait before a transaction counts as final.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_confirmations: Option<u32>,
}

impl NetworkProfile {
    /// The local simulated network has no endpoint of any kind.
    pub fn is_simulated(&self) -> bool {
        self.rpc_url.is_none() && self.rpc_url_env.is_none()
    }

    /// Variables in `accounts_env` whose slot is still empty.
    pub fn missing_account_vars(&self) -> Vec<&str> {
        self.accounts_env
            .iter()
            .enumerate()
            .filter(|(i, _)| !matches!(self.accounts.get(*i), Some(Some(_))))
            .map(|(_, var)| var.as_str())
            .collect()
    }

    /// Confirmations to wait for, defaulting to one block.
    pub fn confirmations(&self) -> u32 {
        self.block_confirmations.unwrap_or(1)
    }

    fn simulated(chain_id: u64) -> Self {
        Self {
            rpc_url: None,
            rpc_url_env: None,
            accounts_env: Vec::new(),
            accounts: Vec::new(),
            chain_id,
            block_confirmations: None,
        }
    }

    fn remote(rpc_url: &str, rpc_url_env: &str, chain_id: u64, confirmations: u32) -> Self {
        Self {
            rpc_url: Some(rpc_url.to_string()),
            rpc_url_env: Some(rpc_url_env.to_string()),
            accounts_env: vec![PRIVATE_KEY_ENV_VAR.to_string()],
            accounts: Vec::new(),
            chain_id,
            block_confirmations: Some(confirmations),
        }
    }
}

/// Solidity compiler settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Exact compiler version (`MAJOR.MINOR.PATCH`).
    pub version: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            version: "0.8.7".to_string(),
        }
    }
}

/// Contract verification settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Environment variable holding the explorer API key.
    pub api_key_env: String,

    /// Explorer API key resolved at load time.
    #[serde(skip)]
    pub api_key: Option<Secret>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            api_key_env: ETHERSCAN_API_KEY_ENV_VAR.to_string(),
            api_key: None,
        }
    }
}

/// Gas usage report settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GasReporterConfig {
    /// Write a report at all.
    pub enabled: bool,

    /// Report path, relative to the project root.
    pub output_file: String,

    /// Disable ANSI colours in the report.
    pub no_colors: bool,

    /// Currency the report is labelled in (ISO 4217 code).
    pub currency: String,

    /// Environment variable holding a market-data API key. Disabled by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_data_api_key_env: Option<String>,

    /// Market-data API key resolved at load time.
    #[serde(skip)]
    pub market_data_api_key: Option<Secret>,
}

impl GasReporterConfig {
    pub fn color_output(&self) -> bool {
        !self.no_colors
    }
}

impl Default for GasReporterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_file: "gas-report.txt".to_string(),
            no_colors: true,
            currency: "USD".to_string(),
            market_data_api_key_env: None,
            market_data_api_key: None,
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert("hardhat".to_string(), NetworkProfile::simulated(31337));
        networks.insert(
            "rinkeby".to_string(),
            NetworkProfile::remote(
                "https://eth-rinkeby.alchemyapi.io/v2/demo",
                "RINKEBY_RPC_URL",
                4,
                6,
            ),
        );
        networks.insert(
            "mumbai".to_string(),
            NetworkProfile::remote(
                "https://polygon-mumbai.g.alchemy.com/v2/demo",
                "MUMBAI_RPC_URL",
                80001,
                6,
            ),
        );

        let deployer = [(31337, 0), (80001, 0), (4, 0)].into_iter().collect();
        let mut named_accounts = BTreeMap::new();
        named_accounts.insert("deployer".to_string(), deployer);

        Self {
            default_network: "hardhat".to_string(),
            networks,
            compiler: CompilerConfig::default(),
            verification: VerificationConfig::default(),
            gas_reporter: GasReporterConfig::default(),
            named_accounts,
            plugins: [
                "@nomicfoundation/hardhat-toolbox",
                "@nomiclabs/hardhat-etherscan",
                "hardhat-gas-reporter",
                "solidity-coverage",
                "hardhat-deploy",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            tasks: vec!["block-number".to_string()],
        }
    }
}

/// Chain ids are map keys, which TOML only allows as strings.
mod chain_keyed {
    use std::collections::BTreeMap;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    type RoleMap = BTreeMap<String, BTreeMap<u64, u32>>;

    pub fn serialize<S: Serializer>(map: &RoleMap, serializer: S) -> Result<S::Ok, S::Error> {
        let keyed: BTreeMap<&str, BTreeMap<String, u32>> = map
            .iter()
            .map(|(role, chains)| {
                let chains = chains
                    .iter()
                    .map(|(chain_id, index)| (chain_id.to_string(), *index))
                    .collect();
                (role.as_str(), chains)
            })
            .collect();
        keyed.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RoleMap, D::Error> {
        let raw: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(role, chains)| {
                let chains = chains
                    .into_iter()
                    .map(|(chain_id, index)| {
                        chain_id.trim().parse::<u64>().map(|id| (id, index)).map_err(|_| {
                            D::Error::custom(format!(
                                "named account '{}' uses non-numeric chain id '{}'",
                                role, chain_id
                            ))
                        })
                    })
                    .collect::<Result<_, _>>()?;
                Ok((role, chains))
            })
            .collect()
    }
}
