//! # Initialization
//!
//! Extension startup: rustls setup, tracing, settings, configuration and the
//! clients used for the rest of the process lifetime.

use crate::config::{load_config, Config, ExtensionSettings};
use crate::lifecycle::{extension_name, LifecycleClient};
use crate::observability;
use crate::provider::{AwsSecretsManager, SecretStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Initialization result containing everything the startup sequence needs
#[derive(Debug)]
pub struct InitializationResult {
    /// Secrets configuration, immutable from here on
    pub config: Config,
    /// Secret store used by the materializer
    pub store: Arc<dyn SecretStore>,
    /// Unregistered Extensions API client
    pub lifecycle: LifecycleClient,
}

/// Initialize the extension runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Settings from the environment
/// - Loading the secrets configuration
/// - Secrets Manager and Extensions API client creation
///
/// # Errors
/// Any failure here is fatal: settings or configuration cannot be loaded, or the
/// HTTP client cannot be built.
pub async fn initialize() -> Result<InitializationResult> {
    // Configure rustls crypto provider FIRST, before any TLS client is built
    // We use ring as the crypto provider
    let provider_installed = rustls::crypto::ring::default_provider()
        .install_default()
        .is_ok();

    observability::init_tracing();
    if !provider_installed {
        debug!("rustls crypto provider was already installed");
    }

    info!(
        "Starting lambda-secrets-prefetch v{}",
        env!("CARGO_PKG_VERSION")
    );

    let settings = ExtensionSettings::from_env().context("Failed to load extension settings")?;
    info!("Got base url {}", settings.runtime_api_base);

    let config = load_config(&settings.config_path).with_context(|| {
        format!(
            "Failed to load secrets configuration from {}",
            settings.config_path.display()
        )
    })?;
    info!(
        "Loaded {} secret(s) in {} group(s), destination {}",
        config.secret_count(),
        config.secret_managers.len(),
        config.secrets_home
    );

    let store: Arc<dyn SecretStore> = Arc::new(
        AwsSecretsManager::new(
            settings.region.as_deref(),
            settings.secrets_manager_endpoint.as_deref(),
        )
        .await,
    );

    let lifecycle = LifecycleClient::new(
        settings.runtime_api_base,
        extension_name(std::env::args_os().next()),
    )
    .context("Failed to create Extensions API client")?;

    Ok(InitializationResult {
        config,
        store,
        lifecycle,
    })
}
