//! # Secret Store Providers
//!
//! The [`SecretStore`] trait is the seam between the materializer and the remote
//! secret store. [`aws::AwsSecretsManager`] is the production implementation; tests
//! substitute an in-memory store.

pub mod aws;

pub use aws::AwsSecretsManager;

use async_trait::async_trait;
use base64::Engine;
use thiserror::Error;
use zeroize::Zeroizing;

/// A secret value as returned by the store
///
/// The buffer is zeroed on drop and `Debug` never prints the content.
pub enum SecretValue {
    Text(Zeroizing<String>),
    Binary(Zeroizing<Vec<u8>>),
}

impl SecretValue {
    /// Build a binary value from the base64 payload held by the store
    ///
    /// # Errors
    /// Returns the decode error when the payload is not valid standard base64.
    pub fn from_base64(encoded: &[u8]) -> Result<Self, base64::DecodeError> {
        let decoded = base64::engine::general_purpose::STANDARD.decode(encoded)?;
        Ok(Self::Binary(Zeroizing::new(decoded)))
    }

    /// Raw bytes written to disk
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes.as_slice(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Binary(_) => "binary",
        }
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self::Text(Zeroizing::new(value.to_string()))
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretValue")
            .field("kind", &self.kind())
            .field("len", &self.as_bytes().len())
            .finish_non_exhaustive()
    }
}

/// Why a fetch failed
#[derive(Debug, Error)]
pub enum FetchCause {
    /// Network, authentication, authorization or not-found errors from the store
    #[error("{0}")]
    Store(String),
    #[error("binary secret is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// A secret could not be fetched from the store
#[derive(Debug, Error)]
#[error("failed to fetch secret {identifier}: {cause}")]
pub struct SecretFetchError {
    pub identifier: String,
    pub cause: FetchCause,
}

impl SecretFetchError {
    pub fn new(identifier: impl Into<String>, cause: impl Into<FetchCause>) -> Self {
        Self {
            identifier: identifier.into(),
            cause: cause.into(),
        }
    }
}

/// Fetch secrets by identifier
///
/// `Ok(None)` means the secret exists but holds no value ("unassigned").
#[async_trait]
pub trait SecretStore: Send + Sync + std::fmt::Debug {
    async fn fetch(&self, identifier: &str) -> Result<Option<SecretValue>, SecretFetchError>;
}
