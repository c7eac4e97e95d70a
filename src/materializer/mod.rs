//! # Secret Materializer
//!
//! Fetches every configured secret concurrently and writes each one to its file
//! under `SecretsHome`.
//!
//! One task is spawned per secret. Every task reports exactly one [`FetchOutcome`]
//! on a channel sized to the number of secrets, and [`materialize`] drains exactly
//! that many outcomes before returning. Failures are collected, never fatal: the
//! function may run with some secrets missing.
//!
//! Secrets sharing a destination path are written one at a time, so the file ends
//! up holding one complete value (whichever write finished last).

mod files;

pub use files::{ensure_secrets_home, write_secret_file};

use crate::config::{Config, ResolvedSecret};
use crate::provider::{SecretFetchError, SecretStore};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

/// Per-secret failure collected during materialization
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error(transparent)]
    Fetch(#[from] SecretFetchError),
    #[error("secret {secret_id} has no target filename")]
    NoTarget { secret_id: String },
    #[error("failed to write secret {secret_id} to {path:?}: {source}")]
    Write {
        secret_id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("task fetching secret {secret_id} did not complete: {source}")]
    Task {
        secret_id: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Result of handling one secret
#[derive(Debug)]
pub enum FetchOutcome {
    Written { secret_id: String, path: PathBuf },
    /// The store holds no value for the secret; nothing is written
    Unassigned { secret_id: String },
    Failed(MaterializeError),
}

/// Counts reported after a materialization pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeSummary {
    pub written: usize,
    pub unassigned: usize,
    pub failed: usize,
}

/// Fetch and write every secret in `config`, returning all per-secret errors
///
/// Blocks until each secret has produced exactly one outcome.
pub async fn materialize(config: &Config, store: Arc<dyn SecretStore>) -> Vec<MaterializeError> {
    materialize_with_summary(config, store).await.1
}

/// Like [`materialize`], also returning outcome counts
pub async fn materialize_with_summary(
    config: &Config,
    store: Arc<dyn SecretStore>,
) -> (MaterializeSummary, Vec<MaterializeError>) {
    let home = PathBuf::from(&config.secrets_home);
    if let Err(e) = ensure_secrets_home(&home).await {
        // Writes below will fail and be reported per secret
        error!(path = %home.display(), error = %e, "Error creating secrets directory");
    }

    let secrets = config.resolved_secrets();
    let total = secrets.len();
    let mut summary = MaterializeSummary::default();
    let mut errors = Vec::new();
    if total == 0 {
        info!("No secrets configured");
        return (summary, errors);
    }

    let mut write_locks: HashMap<PathBuf, Arc<Mutex<()>>> = HashMap::new();
    let (tx, mut rx) = mpsc::channel(total);
    let mut handles = Vec::with_capacity(total);
    for secret in secrets {
        let secret_id = secret.secret_id.clone();
        if secret.path == home {
            warn!(secret.id = %secret_id, "Secret has no target filename, skipping");
            record(
                FetchOutcome::Failed(MaterializeError::NoTarget { secret_id }),
                &mut summary,
                &mut errors,
            );
            continue;
        }
        let write_lock = Arc::clone(write_locks.entry(secret.path.clone()).or_default());
        let store = Arc::clone(&store);
        let tx = tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = handle_secret(store.as_ref(), secret, &write_lock).await;
            // Capacity equals the task count, so this never waits
            if tx.send(outcome).await.is_err() {
                warn!("Outcome receiver dropped before all secrets reported");
            }
        });
        handles.push((secret_id, handle));
    }
    drop(tx);

    let expected = handles.len();
    let mut received = 0;
    while received < expected {
        let Some(outcome) = rx.recv().await else {
            break;
        };
        received += 1;
        record(outcome, &mut summary, &mut errors);
    }

    // A task that panicked never sent its outcome; report it from the join handle
    for (secret_id, handle) in handles {
        if let Err(source) = handle.await {
            record(
                FetchOutcome::Failed(MaterializeError::Task { secret_id, source }),
                &mut summary,
                &mut errors,
            );
        }
    }

    info!(
        written = summary.written,
        unassigned = summary.unassigned,
        failed = summary.failed,
        "Secrets materialized to {}",
        home.display()
    );
    (summary, errors)
}

fn record(
    outcome: FetchOutcome,
    summary: &mut MaterializeSummary,
    errors: &mut Vec<MaterializeError>,
) {
    match outcome {
        FetchOutcome::Written { secret_id, path } => {
            debug!(secret.id = %secret_id, path = %path.display(), "Secret written");
            summary.written += 1;
        }
        FetchOutcome::Unassigned { .. } => summary.unassigned += 1,
        FetchOutcome::Failed(e) => {
            summary.failed += 1;
            errors.push(e);
        }
    }
}

async fn handle_secret(
    store: &dyn SecretStore,
    secret: ResolvedSecret,
    write_lock: &Mutex<()>,
) -> FetchOutcome {
    let ResolvedSecret { secret_id, path } = secret;

    let value = match store.fetch(&secret_id).await {
        Ok(Some(value)) => value,
        Ok(None) => {
            info!(secret.id = %secret_id, "Secret is unassigned, skipping");
            return FetchOutcome::Unassigned { secret_id };
        }
        Err(e) => return FetchOutcome::Failed(e.into()),
    };

    info!(secret.id = %secret_id, kind = value.kind(), "Writing {}", path.display());
    let _guard = write_lock.lock().await;
    match write_secret_file(&path, value.as_bytes()).await {
        Ok(()) => FetchOutcome::Written { secret_id, path },
        Err(source) => FetchOutcome::Failed(MaterializeError::Write {
            secret_id,
            path,
            source,
        }),
    }
}
