//! # Startup Sequence
//!
//! Materialize secrets, then register and hand the process over to the
//! lifecycle event loop. Registration only happens after every secret has
//! reported an outcome: the host may invoke the function as soon as all
//! extensions have registered.

use crate::config::Config;
use crate::lifecycle::{LifecycleClient, Termination};
use crate::materializer::{materialize_with_summary, MaterializeSummary};
use crate::provider::SecretStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Fetch and write every configured secret, logging each failure
///
/// Failures are not fatal; the function runs with whatever was written.
pub async fn populate_secrets(config: &Config, store: Arc<dyn SecretStore>) -> MaterializeSummary {
    let (summary, errors) = materialize_with_summary(config, store).await;
    for e in &errors {
        error!(error = %e, "Secret not materialized");
    }
    if !errors.is_empty() {
        warn!(
            "{} of {} secret(s) could not be materialized",
            errors.len(),
            config.secret_count()
        );
    }
    summary
}

/// Run the full extension lifecycle
///
/// Returns once the host signals termination.
///
/// # Errors
/// Registration failures and event polling transport failures.
pub async fn run(
    config: &Config,
    store: Arc<dyn SecretStore>,
    lifecycle: LifecycleClient,
) -> Result<Termination> {
    populate_secrets(config, store).await;

    let registered = lifecycle
        .register()
        .await
        .context("Failed to register extension")?;

    let termination = registered
        .run()
        .await
        .context("Extension event loop failed")?;
    info!(?termination, "Extension terminated by host");
    Ok(termination)
}
