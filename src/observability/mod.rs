//! # Observability
//!
//! Structured logging for the extension. Output goes to stdout/stderr, which the
//! Lambda service forwards to CloudWatch Logs.

pub mod logging;

pub use logging::{init_tracing, log_directive};
