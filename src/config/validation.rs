//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (named accounts reference declared chains)
//! - Validate value formats (compiler version, URLs, report path, currency)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ToolConfig → Result<(), Vec<ValidationError>>
//! - Missing secrets are not a validation error; they surface at network selection

use std::collections::BTreeMap;
use std::path::{Component, Path};

use thiserror::Error;

use crate::config::schema::ToolConfig;
use crate::tasks::Task;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no networks declared")]
    NoNetworks,

    #[error("default network '{0}' is not declared")]
    UnknownDefaultNetwork(String),

    #[error("network '{network}' has chain id 0")]
    ZeroChainId { network: String },

    #[error("chain id {chain_id} is declared by both '{first}' and '{second}'")]
    DuplicateChainId {
        chain_id: u64,
        first: String,
        second: String,
    },

    #[error("network '{network}' has invalid RPC URL '{url}': {reason}")]
    InvalidRpcUrl {
        network: String,
        url: String,
        reason: String,
    },

    #[error("named account '{role}' references undeclared chain id {chain_id}")]
    UnknownChainReference { role: String, chain_id: u64 },

    #[error("compiler version '{0}' is not MAJOR.MINOR.PATCH")]
    InvalidCompilerVersion(String),

    #[error("gas report output file '{0}' must be a non-empty relative path inside the project")]
    InvalidOutputFile(String),

    #[error("gas report currency '{0}' is not a three-letter code")]
    InvalidCurrency(String),

    #[error("task '{0}' is not a known task")]
    UnknownTask(String),
}

/// Check every semantic invariant of `config`.
pub fn validate_config(config: &ToolConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_networks(config, &mut errors);
    validate_named_accounts(config, &mut errors);

    if !is_semver(&config.compiler.version) {
        errors.push(ValidationError::InvalidCompilerVersion(
            config.compiler.version.clone(),
        ));
    }

    let output_file = &config.gas_reporter.output_file;
    if !is_relative_inside_root(output_file) {
        errors.push(ValidationError::InvalidOutputFile(output_file.clone()));
    }

    let currency = &config.gas_reporter.currency;
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ValidationError::InvalidCurrency(currency.clone()));
    }

    for task in &config.tasks {
        if Task::from_name(task).is_none() {
            errors.push(ValidationError::UnknownTask(task.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_networks(config: &ToolConfig, errors: &mut Vec<ValidationError>) {
    if config.networks.is_empty() {
        errors.push(ValidationError::NoNetworks);
        return;
    }

    if !config.networks.contains_key(&config.default_network) {
        errors.push(ValidationError::UnknownDefaultNetwork(
            config.default_network.clone(),
        ));
    }

    let mut seen: BTreeMap<u64, &str> = BTreeMap::new();
    for (name, profile) in &config.networks {
        if profile.chain_id == 0 {
            errors.push(ValidationError::ZeroChainId {
                network: name.clone(),
            });
        } else if let Some(first) = seen.insert(profile.chain_id, name) {
            errors.push(ValidationError::DuplicateChainId {
                chain_id: profile.chain_id,
                first: first.to_string(),
                second: name.clone(),
            });
        }

        if let Some(url) = &profile.rpc_url {
            if let Err(reason) = check_rpc_url(url) {
                errors.push(ValidationError::InvalidRpcUrl {
                    network: name.clone(),
                    url: url.clone(),
                    reason,
                });
            }
        }
    }
}

fn validate_named_accounts(config: &ToolConfig, errors: &mut Vec<ValidationError>) {
    for (role, chains) in &config.named_accounts {
        for chain_id in chains.keys() {
            let declared = config.networks.values().any(|n| n.chain_id == *chain_id);
            if !declared {
                errors.push(ValidationError::UnknownChainReference {
                    role: role.clone(),
                    chain_id: *chain_id,
                });
            }
        }
    }
}

fn check_rpc_url(raw: &str) -> Result<(), String> {
    let url = url::Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        // The RPC client speaks JSON-RPC over HTTP only.
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

/// `MAJOR.MINOR.PATCH`, numeric, no leading zeros.
pub fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts.iter().all(|part| {
            !part.is_empty()
                && part.chars().all(|c| c.is_ascii_digit())
                && (part.len() == 1 || !part.starts_with('0'))
        })
}

fn is_relative_inside_root(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    let components: Vec<Component<'_>> = Path::new(path).components().collect();
    components
        .iter()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && components.iter().any(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ToolConfig::default()), Ok(()));
    }

    #[test]
    fn test_semver() {
        assert!(is_semver("0.8.7"));
        assert!(is_semver("0.8.20"));
        assert!(!is_semver("0.8"));
        assert!(!is_semver("^0.8.7"));
        assert!(!is_semver("0.08.7"));
        assert!(!is_semver("0.8.7-nightly"));
    }

    #[test]
    fn test_output_file_must_be_relative() {
        assert!(is_relative_inside_root("gas-report.txt"));
        assert!(is_relative_inside_root("reports/gas.txt"));
        assert!(!is_relative_inside_root(""));
        assert!(!is_relative_inside_root("/tmp/gas.txt"));
        assert!(!is_relative_inside_root("../gas.txt"));
        assert!(!is_relative_inside_root("."));
        assert!(!is_relative_inside_root("./"));
        assert!(is_relative_inside_root("./gas.txt"));
    }

    #[test]
    fn test_duplicate_chain_ids() {
        let mut config = ToolConfig::default();
        config.networks.get_mut("mumbai").unwrap().chain_id = 4;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateChainId {
            chain_id: 4,
            first: "mumbai".to_string(),
            second: "rinkeby".to_string(),
        }));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ToolConfig::default();
        config.default_network = "goerli".to_string();
        config.compiler.version = "latest".to_string();
        config.gas_reporter.currency = "usd".to_string();
        config.tasks.push("flatten".to_string());
        config
            .named_accounts
            .get_mut("deployer")
            .unwrap()
            .insert(5, 0);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::UnknownDefaultNetwork("goerli".into())));
        assert!(errors.contains(&ValidationError::UnknownChainReference {
            role: "deployer".into(),
            chain_id: 5,
        }));
    }

    #[test]
    fn test_websocket_rpc_url_rejected() {
        let mut config = ToolConfig::default();
        config.networks.get_mut("mumbai").unwrap().rpc_url = Some("wss://node.example".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidRpcUrl {
                network: "mumbai".into(),
                url: "wss://node.example".into(),
                reason: "unsupported scheme 'wss'".into(),
            }]
        );
    }

    #[test]
    fn test_rpc_url_scheme() {
        let mut config = ToolConfig::default();
        config.networks.get_mut("rinkeby").unwrap().rpc_url = Some("ftp://node".into());

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            &errors[0],
            ValidationError::InvalidRpcUrl { network, .. } if network == "rinkeby"
        ));
    }
}
