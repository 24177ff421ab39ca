//! The `block-number` task.

use crate::blockchain::RpcClient;
use crate::tasks::{TaskContext, TaskError};

/// Fetch the latest block of the selected network after checking its chain id.
pub async fn run(ctx: &TaskContext<'_>) -> Result<String, TaskError> {
    let client = RpcClient::for_network(&ctx.network, ctx.rpc_timeout)?;
    client.verify_chain_id().await?;
    let block = client.get_block_number().await?;

    tracing::debug!(network = ctx.network.name, block, "Fetched block number");
    Ok(format!("Current block number: {}", block))
}
