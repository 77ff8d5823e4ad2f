//! AWS SDK configuration
//!
//! Builds the shared SDK configuration and the Bedrock Runtime client,
//! supporting a custom endpoint for local testing. The Bedrock control-plane
//! client is only used by the diagnostic binary to list foundation models.

use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region, SdkConfig};
use aws_sdk_bedrock::Client as BedrockControlClient;
use aws_sdk_bedrockruntime::Client as BedrockRuntimeClient;

use crate::config::Settings;

/// AWS configuration builder
///
/// Credentials come from the default provider chain (environment,
/// shared profile, instance or task role).
pub struct AwsConfigBuilder<'a> {
    settings: &'a Settings,
}

impl<'a> AwsConfigBuilder<'a> {
    /// Create a new AWS configuration builder
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Build the base AWS SDK configuration
    pub async fn build_sdk_config(&self) -> SdkConfig {
        let region_provider =
            RegionProviderChain::first_try(Region::new(self.settings.aws_region.clone()))
                .or_default_provider();

        aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await
    }

    /// Create a Bedrock Runtime client with optional custom endpoint
    ///
    /// If `BEDROCK_ENDPOINT_URL` is set in settings, the client will use
    /// that endpoint.
    pub async fn build_bedrock_client(&self) -> BedrockRuntimeClient {
        let sdk_config = self.build_sdk_config().await;

        if let Some(endpoint_url) = &self.settings.bedrock_endpoint_url {
            tracing::info!(endpoint = %endpoint_url, "Using custom Bedrock endpoint");

            let bedrock_config = aws_sdk_bedrockruntime::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint_url)
                .build();

            BedrockRuntimeClient::from_conf(bedrock_config)
        } else {
            BedrockRuntimeClient::new(&sdk_config)
        }
    }

    /// Create a Bedrock control-plane client (model catalog queries)
    pub async fn build_control_client(&self) -> BedrockControlClient {
        BedrockControlClient::new(&self.build_sdk_config().await)
    }
}

/// Build AWS SDK config from settings (convenience function)
pub async fn build_aws_config(settings: &Settings) -> SdkConfig {
    AwsConfigBuilder::new(settings).build_sdk_config().await
}

/// Create a Bedrock Runtime client from settings (convenience function)
pub async fn create_bedrock_client(settings: &Settings) -> BedrockRuntimeClient {
    AwsConfigBuilder::new(settings).build_bedrock_client().await
}

/// Create a Bedrock control-plane client from settings (convenience function)
pub async fn create_bedrock_control_client(settings: &Settings) -> BedrockControlClient {
    AwsConfigBuilder::new(settings).build_control_client().await
}
