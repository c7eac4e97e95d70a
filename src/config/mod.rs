//! # Extension Configuration
//!
//! Two layers of configuration:
//!
//! - [`ExtensionSettings`]: runtime settings loaded from environment variables
//!   (host address, region, config file location).
//! - [`Config`]: the secrets to prefetch, loaded once from a YAML file shipped with
//!   the function package. Defaults are applied on load and the result is never
//!   mutated afterwards.
//!
//! ```yaml
//! SecretsHome: /tmp/secrets
//! SecretManagers:
//!   - prefix: app/
//!     Secrets:
//!       - secretname: db
//!       - secretname: api
//!         filename: api.key
//! ```

mod settings;

pub use settings::ExtensionSettings;

use crate::constants::DEFAULT_SECRETS_HOME;
use serde::{Deserialize, Deserializer};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that prevent the extension from starting
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Secrets to prefetch and where to put them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Destination directory for materialized secrets
    #[serde(
        rename = "SecretsHome",
        alias = "secretshome",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub secrets_home: String,
    #[serde(rename = "SecretManagers", default)]
    pub secret_managers: Vec<SecretManager>,
}

/// A group of secrets sharing a common prefix in the store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretManager {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prefix: String,
    #[serde(rename = "Secrets", alias = "secrets", default)]
    pub secrets: Vec<SecretEntry>,
}

/// A single secret and the file it is written to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretEntry {
    /// Name within the group; empty means the prefix alone is the identifier
    #[serde(default, deserialize_with = "null_as_empty")]
    pub secretname: String,
    /// Target file name inside `SecretsHome`, defaults to `secretname`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub filename: String,
}

/// Treat an explicit YAML null (`filename:`) the same as a missing key
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A fully resolved secret: store identifier plus destination path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    pub secret_id: String,
    pub path: PathBuf,
}

impl Config {
    /// Parse configuration from YAML text and apply defaults
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for invalid YAML.
    pub fn from_yaml(source: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        Ok(config.with_defaults())
    }

    /// Fill in `SecretsHome` and every missing `filename`
    ///
    /// Applying defaults twice yields the same configuration.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        if self.secrets_home.is_empty() {
            self.secrets_home = DEFAULT_SECRETS_HOME.to_string();
        }
        for manager in &mut self.secret_managers {
            for secret in &mut manager.secrets {
                if secret.filename.is_empty() {
                    secret.filename.clone_from(&secret.secretname);
                }
            }
        }
        self
    }

    /// Total number of secrets across every group
    #[must_use]
    pub fn secret_count(&self) -> usize {
        self.secret_managers.iter().map(|m| m.secrets.len()).sum()
    }

    /// Every secret with its prefixed store identifier and destination path, in
    /// configuration order
    ///
    /// Destination paths never leave `SecretsHome`. A filename with nothing left
    /// after confinement resolves to `SecretsHome` itself.
    #[must_use]
    pub fn resolved_secrets(&self) -> Vec<ResolvedSecret> {
        let home = Path::new(&self.secrets_home);
        self.secret_managers
            .iter()
            .flat_map(|manager| {
                manager.secrets.iter().map(move |secret| ResolvedSecret {
                    secret_id: format!("{}{}", manager.prefix, secret.secretname),
                    path: confined_join(home, &secret.filename),
                })
            })
            .collect()
    }
}

/// Join `filename` under `home`, keeping only its normal components
///
/// Root, drive prefixes, `.` and `..` are dropped, so `/etc/passwd` lands at
/// `<home>/etc/passwd` and `../x` at `<home>/x`.
fn confined_join(home: &Path, filename: &str) -> PathBuf {
    Path::new(filename)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .fold(home.to_path_buf(), |path, part| path.join(part))
}

/// Load the secrets configuration from a YAML file
///
/// # Errors
/// Returns a [`ConfigError`] if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Config::from_yaml(&source, path)?;
    debug!(
        path = %path.display(),
        secrets_home = %config.secrets_home,
        secrets = config.secret_count(),
        "Loaded configuration"
    );
    Ok(config)
}
