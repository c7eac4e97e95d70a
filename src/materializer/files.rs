//! # Secret Files
//!
//! Destination directory setup and secret file writes.

use crate::constants::{SECRETS_HOME_MODE, SECRET_FILE_MODE};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Create the destination directory and any missing parents
///
/// Succeeds when the directory already exists.
pub async fn ensure_secrets_home(path: &Path) -> std::io::Result<()> {
    tokio::fs::DirBuilder::new()
        .recursive(true)
        .mode(SECRETS_HOME_MODE)
        .create(path)
        .await
}

/// Write a secret file, replacing any previous content
///
/// The write is not atomic: a crash midway can leave a partial file.
pub async fn write_secret_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(SECRET_FILE_MODE)
        .open(path)
        .await?;
    file.write_all(contents).await?;
    file.flush().await
}
