//! # Constants
//!
//! Default values and environment variable names used across the extension.

/// Destination directory when `SecretsHome` is not configured
pub const DEFAULT_SECRETS_HOME: &str = "/tmp/secrets";

/// Configuration file shipped with the function package
pub const DEFAULT_CONFIG_PATH: &str = "/var/task/config.yaml";

/// Name used for registration when the executable name cannot be determined
pub const DEFAULT_EXTENSION_NAME: &str = "lambda-secrets-prefetch";

/// Permissions of the destination directory when it has to be created
pub const SECRETS_HOME_MODE: u32 = 0o755;

/// Permissions of every materialized secret file
pub const SECRET_FILE_MODE: u32 = 0o644;

/// Tracing filter directive used when neither `RUST_LOG` nor `LOG_LEVEL` apply
pub const DEFAULT_LOG_DIRECTIVE: &str = "lambda_secrets_prefetch=info";

// Environment variables
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_RUNTIME_API: &str = "AWS_LAMBDA_RUNTIME_API";
pub const ENV_AWS_REGION: &str = "AWS_REGION";
pub const ENV_CONFIG_PATH: &str = "SECRETS_CONFIG_PATH";
pub const ENV_SECRETS_MANAGER_ENDPOINT: &str = "AWS_SECRETS_MANAGER_ENDPOINT";
