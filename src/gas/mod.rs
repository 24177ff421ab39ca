//! Gas usage reporting.
//!
//! # Data Flow
//! ```text
//! gas samples (JSON: contract, method, gas_used)
//!     → report.rs (aggregate per contract method)
//!     → render with gas_reporter settings (colour, currency)
//!     → output_file under the project root
//! ```
//!
//! # Design Decisions
//! - The report header carries only public settings; secrets never reach it
//! - Amounts stay in gas units; no market-data pricing is applied

pub mod report;

pub use report::{GasReport, GasReportError, GasRow, GasSample};
