//! Configuration management module
//!
//! This module handles loading and validating application configuration
//! from environment variables and .env files.

pub mod aws;
pub mod settings;

pub use aws::{
    build_aws_config, create_bedrock_client, create_bedrock_control_client, AwsConfigBuilder,
};
pub use settings::{
    Environment, InferenceParams, ModelFamily, ModelTarget, Settings, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL_ID, DEFAULT_REGION, DEFAULT_TEMPERATURE,
};
