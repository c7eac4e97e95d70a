//! # Lifecycle Error Types

use thiserror::Error;

/// Failures talking to the Extensions API
///
/// All of them are fatal: the host is expected to restart the execution
/// environment.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("registration response (status {status}) did not include a Lambda-Extension-Identifier header: {body}")]
    MissingIdentifier { status: u16, body: String },
}
