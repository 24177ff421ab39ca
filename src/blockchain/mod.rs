//! Blockchain access for tasks.
//!
//! # Data Flow
//! ```text
//! SelectedNetwork (account secrets, RPC URL, chain id)
//!     → wallet.rs (named account → signer)
//!     → client.rs (RPC connection with timeouts)
//! ```
//!
//! # Security Constraints
//! - Private keys only come from the loaded configuration's secrets
//! - Never log private keys or sensitive data
//! - All RPC calls have a timeout

pub mod client;
pub mod types;
pub mod wallet;

pub use client::RpcClient;
pub use types::{BlockchainError, BlockchainResult, ChainId};
pub use wallet::{named_account, Wallet};
