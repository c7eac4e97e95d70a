//! # AWS Secrets Manager Client
//!
//! Client for reading secret values from AWS Secrets Manager.
//!
//! Authentication and region come from the Lambda execution environment when the
//! client is built; individual fetches take only the secret identifier.

mod auth;

use crate::provider::{FetchCause, SecretFetchError, SecretStore, SecretValue};
use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueOutput;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use tracing::{debug, info_span, Instrument};
use zeroize::Zeroizing;

use self::auth::create_sdk_config;

/// AWS Secrets Manager provider implementation
pub struct AwsSecretsManager {
    client: SecretsManagerClient,
    region: Option<String>,
}

impl std::fmt::Debug for AwsSecretsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretsManager")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl AwsSecretsManager {
    /// Create a new AWS Secrets Manager client from the default credential chain
    pub async fn new(region: Option<&str>, endpoint: Option<&str>) -> Self {
        let sdk_config = create_sdk_config(region, endpoint).await;
        Self {
            client: SecretsManagerClient::new(&sdk_config),
            region: region.map(str::to_string),
        }
    }
}

#[async_trait]
impl SecretStore for AwsSecretsManager {
    async fn fetch(&self, identifier: &str) -> Result<Option<SecretValue>, SecretFetchError> {
        let span = info_span!(
            "aws.secretsmanager.secret.get",
            secret.id = identifier,
            region = self.region.as_deref().unwrap_or("default")
        );

        async move {
            debug!("Retrieving secret");
            let output = self
                .client
                .get_secret_value()
                .secret_id(identifier)
                .send()
                .await
                .map_err(|e| {
                    SecretFetchError::new(
                        identifier,
                        FetchCause::Store(DisplayErrorContext(&e).to_string()),
                    )
                })?;

            secret_value_from_output(output).map_err(|e| SecretFetchError::new(identifier, e))
        }
        .instrument(span)
        .await
    }
}

/// Extract the secret value from a `GetSecretValue` response
///
/// Depending on whether the secret is a string or binary, one of the fields is
/// populated. Binary payloads hold base64 text and are decoded here. A response
/// with neither field is an unassigned secret.
fn secret_value_from_output(
    output: GetSecretValueOutput,
) -> Result<Option<SecretValue>, base64::DecodeError> {
    if let Some(text) = output.secret_string {
        return Ok(Some(SecretValue::Text(Zeroizing::new(text))));
    }
    output
        .secret_binary
        .map(|blob| SecretValue::from_base64(blob.as_ref()))
        .transpose()
}
