//! # Lambda Secrets Prefetch
//!
//! An AWS Lambda extension that materializes AWS Secrets Manager secrets as files
//! before the function's first invocation.
//!
//! ## Overview
//!
//! On a cold start the extension:
//!
//! 1. **Loads configuration** - reads `/var/task/config.yaml` (or `SECRETS_CONFIG_PATH`)
//! 2. **Fetches secrets** - retrieves every configured secret from Secrets Manager concurrently
//! 3. **Writes files** - stores each secret under `SecretsHome` (default `/tmp/secrets`)
//! 4. **Registers** - registers with the Extensions API for `INVOKE` and `SHUTDOWN`
//! 5. **Waits** - long-polls lifecycle events until the host ends the extension
//!
//! Secrets that fail to materialize are logged and skipped; the function still starts.

use anyhow::Result;
use lambda_secrets_prefetch::runtime::{initialize, run};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the extension runtime
    let init_result = initialize().await?;

    // Materialize secrets, register and run the event loop
    run(
        &init_result.config,
        init_result.store,
        init_result.lifecycle,
    )
    .await?;

    Ok(())
}
