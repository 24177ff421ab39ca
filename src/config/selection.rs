//! Active network selection.
//!
//! Loading tolerates missing secrets; selecting a network for use does not.
//! A remote network without an account secret or RPC URL is rejected here,
//! before any task touches the chain.

use crate::config::loader::ConfigError;
use crate::config::schema::{NetworkProfile, ToolConfig};
use crate::config::secret::Secret;

/// Endpoint of a locally running simulated node.
pub const LOCAL_NODE_URL: &str = "http://127.0.0.1:8545";

/// A network chosen for use, with its requirements checked.
#[derive(Debug, Clone, Copy)]
pub struct SelectedNetwork<'a> {
    pub name: &'a str,
    pub profile: &'a NetworkProfile,
}

impl ToolConfig {
    /// Select `name`, or the default network when `None`.
    pub fn select_network(&self, name: Option<&str>) -> Result<SelectedNetwork<'_>, ConfigError> {
        let name = name.unwrap_or(&self.default_network);
        let (name, profile) =
            self.networks
                .get_key_value(name)
                .ok_or_else(|| ConfigError::UnknownNetwork {
                    name: name.to_string(),
                    declared: self.networks.keys().cloned().collect::<Vec<_>>().join(", "),
                })?;

        if !profile.is_simulated() {
            if profile.rpc_url.is_none() {
                return Err(ConfigError::MissingRpcUrl {
                    network: name.clone(),
                    var: profile.rpc_url_env.clone().unwrap_or_default(),
                });
            }
            if profile.accounts_env.is_empty() {
                return Err(ConfigError::MissingSecret {
                    network: name.clone(),
                    vars: "accounts_env in the network profile".to_string(),
                });
            }
            // Every slot must be set: roles index into these positions.
            let missing = profile.missing_account_vars();
            if !missing.is_empty() {
                return Err(ConfigError::MissingSecret {
                    network: name.clone(),
                    vars: missing.join(", "),
                });
            }
        }

        tracing::debug!(network = %name, chain_id = profile.chain_id, "Network selected");
        Ok(SelectedNetwork {
            name: name.as_str(),
            profile,
        })
    }

    /// Account index of `role` on `chain_id`.
    pub fn account_index(&self, role: &str, chain_id: u64) -> Result<u32, ConfigError> {
        let chains = self
            .named_accounts
            .get(role)
            .ok_or_else(|| ConfigError::UnknownRole(role.to_string()))?;
        chains
            .get(&chain_id)
            .copied()
            .ok_or_else(|| ConfigError::UnmappedRole {
                role: role.to_string(),
                chain_id,
            })
    }
}

impl<'a> SelectedNetwork<'a> {
    pub fn chain_id(&self) -> u64 {
        self.profile.chain_id
    }

    pub fn is_simulated(&self) -> bool {
        self.profile.is_simulated()
    }

    /// JSON-RPC endpoint; the local node for the simulated network.
    pub fn rpc_url(&self) -> &'a str {
        let profile: &'a NetworkProfile = self.profile;
        profile.rpc_url.as_deref().unwrap_or(LOCAL_NODE_URL)
    }

    /// Secret at `index`, or `None` when the network declares no accounts.
    ///
    /// An index whose variable is unset is a `MissingSecret` for that variable;
    /// it never falls through to another slot.
    pub fn account(&self, role: &str, index: u32) -> Result<Option<&'a Secret>, ConfigError> {
        let profile: &'a NetworkProfile = self.profile;
        if profile.accounts_env.is_empty() {
            return Ok(None);
        }
        let var = profile
            .accounts_env
            .get(index as usize)
            .ok_or_else(|| ConfigError::AccountIndexOutOfRange {
                role: role.to_string(),
                network: self.name.to_string(),
                index,
                available: profile.accounts_env.len(),
            })?;
        match profile.accounts.get(index as usize) {
            Some(Some(secret)) => Ok(Some(secret)),
            _ => Err(ConfigError::MissingSecret {
                network: self.name.to_string(),
                vars: var.clone(),
            }),
        }
    }
}
