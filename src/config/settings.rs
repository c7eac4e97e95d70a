//! # Runtime Settings
//!
//! Extension settings loaded from environment variables provided by the Lambda
//! execution environment.

use super::ConfigError;
use crate::constants::{
    DEFAULT_CONFIG_PATH, ENV_AWS_REGION, ENV_CONFIG_PATH, ENV_RUNTIME_API,
    ENV_SECRETS_MANAGER_ENDPOINT,
};
use std::path::PathBuf;

/// Runtime settings for the extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSettings {
    /// Base URL of the Extensions API, `http://<AWS_LAMBDA_RUNTIME_API>`
    pub runtime_api_base: String,
    /// Region used to authenticate against Secrets Manager
    pub region: Option<String>,
    /// Location of the secrets configuration file
    pub config_path: PathBuf,
    /// Secrets Manager endpoint override (local mock servers)
    pub secrets_manager_endpoint: Option<String>,
}

impl ExtensionSettings {
    /// Load settings from the process environment
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingEnv`] when `AWS_LAMBDA_RUNTIME_API` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingEnv`] when `AWS_LAMBDA_RUNTIME_API` is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let runtime_api =
            non_empty(ENV_RUNTIME_API).ok_or(ConfigError::MissingEnv(ENV_RUNTIME_API))?;

        Ok(Self {
            runtime_api_base: format!("http://{runtime_api}"),
            region: non_empty(ENV_AWS_REGION),
            config_path: env_var_or_default(&lookup, ENV_CONFIG_PATH, DEFAULT_CONFIG_PATH.into()),
            secrets_manager_endpoint: non_empty(ENV_SECRETS_MANAGER_ENDPOINT),
        })
    }
}

/// Read environment variable or return default value
fn env_var_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
