//! Lambda Secrets Prefetch Library
//!
//! Core functionality of the secrets prefetch extension. Tests are included in
//! the module files and under `tests/`.

pub mod config;
pub mod constants;
pub mod lifecycle;
pub mod materializer;
pub mod observability;
pub mod provider;
pub mod runtime;
