//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! chainrig.toml (or built-in record)
//!     → loader.rs (parse & deserialize)
//!     → env.rs (resolve URLs and secrets from the environment)
//!     → validation.rs (semantic checks)
//!     → ToolConfig (validated, immutable)
//!     → selection.rs (pick the active network, require its secrets)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded and built once per process
//! - All fields have defaults; an empty file yields the built-in record
//! - Secrets are resolved at load time and never serialized
//! - Missing secrets fail network selection, never loading

pub mod env;
pub mod loader;
pub mod schema;
pub mod secret;
pub mod selection;
pub mod validation;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use loader::{load_from_env, ConfigError, ConfigLoader};
pub use schema::{GasReporterConfig, NetworkProfile, ToolConfig};
pub use secret::Secret;
pub use selection::SelectedNetwork;
pub use validation::ValidationError;
