//! # AWS Secrets Manager Authentication
//!
//! Handles AWS SDK configuration and authentication setup.

use aws_config::SdkConfig;
use tracing::info;

/// Create AWS SDK config using the default credential chain
///
/// Inside Lambda the chain resolves the execution role credentials from the
/// environment. `region` overrides the chain's region lookup when set, and
/// `endpoint` routes requests to a local mock server instead of real AWS.
pub async fn create_sdk_config(region: Option<&str>, endpoint: Option<&str>) -> SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(region) = region {
        builder = builder.region(aws_config::Region::new(region.to_string()));
    } else {
        info!("AWS_REGION not set, relying on the default region provider chain");
    }

    if let Some(endpoint) = endpoint {
        info!("Routing AWS Secrets Manager requests to {}", endpoint);
        builder = builder.endpoint_url(endpoint);
    }

    builder.load().await
}
