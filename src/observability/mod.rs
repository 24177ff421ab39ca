//! Observability subsystem.
//!
//! Every subsystem emits `tracing` events with structured fields; secrets are
//! only ever logged as presence flags.

pub mod logging;

pub use logging::init_logging;
