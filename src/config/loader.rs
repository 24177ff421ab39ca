//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::env::{EnvSource, ProcessEnv};
use crate::config::schema::ToolConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Project-level configuration file picked up from the working directory.
pub const PROJECT_CONFIG_FILE: &str = "chainrig.toml";

/// Error type for configuration loading and network selection.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("unknown network '{name}' (declared: {declared})")]
    UnknownNetwork { name: String, declared: String },

    #[error("network '{network}' needs an account secret; set {vars}")]
    MissingSecret { network: String, vars: String },

    #[error("network '{network}' has no RPC URL; set {var}")]
    MissingRpcUrl { network: String, var: String },

    #[error("unknown named account '{0}'")]
    UnknownRole(String),

    #[error("named account '{role}' has no entry for chain id {chain_id}")]
    UnmappedRole { role: String, chain_id: u64 },

    #[error(
        "named account '{role}' uses index {index} but network '{network}' has {available} account(s)"
    )]
    AccountIndexOutOfRange {
        role: String,
        network: String,
        index: u32,
        available: usize,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds a [`ToolConfig`] from a file (or the built-in record) and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load, resolve and validate the configuration.
    ///
    /// Source priority:
    /// 1. Explicit `path` (must exist)
    /// 2. `./chainrig.toml`
    /// 3. Built-in record
    ///
    /// Unset secrets never fail the load.
    pub fn load(path: Option<&Path>, env: &dyn EnvSource) -> Result<ToolConfig, ConfigError> {
        let source = path.map(Path::to_path_buf).or_else(Self::project_config_path);

        let config = match &source {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                tracing::debug!(path = %path.display(), "Parsing configuration file");
                parse_config(&content)?
            }
            None => {
                tracing::debug!("No configuration file, using built-in record");
                ToolConfig::default()
            }
        };

        Self::finish(config, env)
    }

    /// Load from TOML text instead of a file.
    pub fn load_str(content: &str, env: &dyn EnvSource) -> Result<ToolConfig, ConfigError> {
        let config = parse_config(content)?;
        Self::finish(config, env)
    }

    /// The project configuration file, if one exists in the working directory.
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG_FILE);
        path.exists().then_some(path)
    }

    fn finish(mut config: ToolConfig, env: &dyn EnvSource) -> Result<ToolConfig, ConfigError> {
        resolve_env(&mut config, env);
        validate_config(&config).map_err(ConfigError::Validation)?;

        tracing::info!(
            default_network = %config.default_network,
            networks = config.networks.len(),
            compiler = %config.compiler.version,
            verification_key = config.verification.api_key.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Parse TOML over the built-in defaults.
///
/// Named accounts index into network chain ids, so a file that declares its
/// own `networks` starts from no named accounts rather than the built-in ones.
fn parse_config(content: &str) -> Result<ToolConfig, ConfigError> {
    let table: toml::Table = toml::from_str(content)?;
    let own_networks = table.contains_key("networks") && !table.contains_key("named_accounts");

    let mut config: ToolConfig = toml::Value::Table(table).try_into()?;
    if own_networks {
        config.named_accounts.clear();
    }
    Ok(config)
}

/// Load `.env`, then the configuration from the process environment.
pub fn load_from_env(path: Option<&Path>) -> Result<ToolConfig, ConfigError> {
    let env = ProcessEnv::with_dotenv();
    ConfigLoader::load(path, &env)
}

fn resolve_env(config: &mut ToolConfig, env: &dyn EnvSource) {
    for (name, profile) in config.networks.iter_mut() {
        if let Some(var) = &profile.rpc_url_env {
            if let Some(url) = env.var(var).filter(|url| !url.trim().is_empty()) {
                tracing::debug!(network = %name, var = %var, "RPC URL taken from environment");
                profile.rpc_url = Some(url.trim().to_string());
            }
        }

        profile.accounts = profile
            .accounts_env
            .iter()
            .map(|var| {
                let secret = env.secret(var);
                if secret.is_none() {
                    tracing::debug!(network = %name, var = %var, "Account secret not set");
                }
                secret
            })
            .collect();
    }

    config.verification.api_key = env.secret(&config.verification.api_key_env);

    config.gas_reporter.market_data_api_key = config
        .gas_reporter
        .market_data_api_key_env
        .as_deref()
        .and_then(|var| env.secret(var));
}
