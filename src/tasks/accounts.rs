//! The `accounts` task.

use std::fmt::Write;

use crate::blockchain::{named_account, BlockchainError};
use crate::config::ConfigError;
use crate::tasks::{TaskContext, TaskError};

/// List each named account's address on the selected network.
///
/// Roles without an entry for this chain are listed as unmapped rather than
/// failing the task.
pub fn run(ctx: &TaskContext<'_>) -> Result<String, TaskError> {
    let chain_id = ctx.network.chain_id();
    let mut out = String::new();

    for role in ctx.config.named_accounts.keys() {
        match named_account(ctx.config, &ctx.network, role) {
            Ok(wallet) => {
                let _ = writeln!(out, "{}: {}", role, wallet.address());
            }
            Err(BlockchainError::Config(ConfigError::UnmappedRole { .. })) => {
                let _ = writeln!(out, "{}: (not mapped on chain {})", role, chain_id);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::ToolConfig;

    #[test]
    fn test_accounts_on_simulated_network() {
        let mut config = ToolConfig::default();
        config
            .named_accounts
            .insert("treasury".into(), [(4, 0)].into_iter().collect());
        let ctx = TaskContext {
            config: &config,
            network: config.select_network(None).unwrap(),
            rpc_timeout: Duration::from_secs(1),
        };

        let out = run(&ctx).unwrap();
        assert_eq!(
            out,
            "deployer: 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266\n\
             treasury: (not mapped on chain 31337)"
        );
    }
}
