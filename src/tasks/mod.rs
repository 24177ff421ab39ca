//! Task registry.
//!
//! # Responsibilities
//! - Map task names to implementations
//! - Expose built-in tasks plus the custom tasks the configuration registers
//! - Run a task against the selected network
//!
//! # Design Decisions
//! - Tasks are a closed enum; the configuration only chooses which custom
//!   tasks are registered
//! - Tasks return their output as text; printing is the caller's concern

pub mod accounts;
pub mod block_number;

use std::time::Duration;

use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::config::{ConfigError, SelectedNetwork, ToolConfig};

/// A runnable task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Prints the latest block number of the selected network.
    BlockNumber,
    /// Prints the address of every named account on the selected network.
    Accounts,
}

impl Task {
    pub const ALL: [Task; 2] = [Task::BlockNumber, Task::Accounts];

    pub fn name(&self) -> &'static str {
        match self {
            Task::BlockNumber => "block-number",
            Task::Accounts => "accounts",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Task::BlockNumber => "Prints the current block number",
            Task::Accounts => "Prints the address of each named account",
        }
    }

    /// Built-in tasks are always available; custom ones must be registered.
    pub fn is_builtin(&self) -> bool {
        matches!(self, Task::Accounts)
    }

    pub fn from_name(name: &str) -> Option<Task> {
        Task::ALL.into_iter().find(|task| task.name() == name)
    }

    pub async fn run(self, ctx: &TaskContext<'_>) -> Result<String, TaskError> {
        tracing::info!(task = self.name(), network = ctx.network.name, "Running task");
        match self {
            Task::BlockNumber => block_number::run(ctx).await,
            Task::Accounts => accounts::run(ctx),
        }
    }
}

/// Everything a task may read.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    pub config: &'a ToolConfig,
    pub network: SelectedNetwork<'a>,
    pub rpc_timeout: Duration,
}

/// The tasks available under a given configuration.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn from_config(config: &ToolConfig) -> Self {
        let tasks = Task::ALL
            .into_iter()
            .filter(|task| task.is_builtin() || config.tasks.iter().any(|t| t == task.name()))
            .collect();
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn lookup(&self, name: &str) -> Result<Task, TaskError> {
        self.tasks
            .iter()
            .copied()
            .find(|task| task.name() == name)
            .ok_or_else(|| TaskError::Unknown {
                name: name.to_string(),
                available: self
                    .tasks
                    .iter()
                    .map(|task| task.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Errors raised while resolving or running a task.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("unknown task '{name}' (available: {available})")]
    Unknown { name: String, available: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}
