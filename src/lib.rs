//! Typed configuration for a smart-contract development toolchain.
//!
//! The configuration record is built once per process from a TOML file (or
//! the built-in record) plus environment secrets, then shared read-only by
//! the tasks and the gas reporter.

pub mod blockchain;
pub mod config;
pub mod gas;
pub mod observability;
pub mod tasks;

pub use config::{ConfigLoader, SelectedNetwork, ToolConfig};
pub use tasks::{Task, TaskRegistry};
