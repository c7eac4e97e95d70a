//! # Logging
//!
//! Tracing subscriber setup. `RUST_LOG` takes precedence; otherwise `LOG_LEVEL`
//! (`debug` or `trace`, case-insensitive) raises the crate's verbosity from the
//! default `info`.

use crate::constants::{DEFAULT_LOG_DIRECTIVE, ENV_LOG_LEVEL};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Map a `LOG_LEVEL` value to a tracing filter directive
///
/// Unrecognized values keep the default verbosity.
#[must_use]
pub fn log_directive(log_level: Option<&str>) -> &'static str {
    match log_level.map(str::to_ascii_lowercase).as_deref() {
        Some("debug") => "lambda_secrets_prefetch=debug",
        Some("trace") => "lambda_secrets_prefetch=trace",
        _ => DEFAULT_LOG_DIRECTIVE,
    }
}

/// Install the global tracing subscriber
pub fn init_tracing() {
    let log_level = std::env::var(ENV_LOG_LEVEL).ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_directive(log_level.as_deref()).into());

    // CloudWatch does not render ANSI colours
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
    {
        warn!("Tracing subscriber already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_debug_and_trace() {
        assert_eq!(log_directive(Some("debug")), "lambda_secrets_prefetch=debug");
        assert_eq!(log_directive(Some("TRACE")), "lambda_secrets_prefetch=trace");
        assert_eq!(log_directive(Some("Debug")), "lambda_secrets_prefetch=debug");
    }

    #[test]
    fn test_log_level_default() {
        assert_eq!(log_directive(None), DEFAULT_LOG_DIRECTIVE);
        assert_eq!(log_directive(Some("")), DEFAULT_LOG_DIRECTIVE);
        assert_eq!(log_directive(Some("warn")), DEFAULT_LOG_DIRECTIVE);
    }
}
