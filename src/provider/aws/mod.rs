//! # AWS Providers
//!
//! - `secrets_manager`: AWS Secrets Manager for secrets

pub mod secrets_manager;

// Re-export for convenience
pub use secrets_manager::AwsSecretsManager;
