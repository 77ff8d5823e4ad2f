//! Application settings and configuration
//!
//! Settings are read once from environment variables (and an optional `.env`
//! file) at process start and are read-only afterwards.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::env;
use std::fmt;

/// Model used when `BEDROCK_MODEL_ID` is not set
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Region used when `AWS_REGION` is not set
pub const DEFAULT_REGION: &str = "us-east-1";

/// Maximum output tokens requested from the model
pub const DEFAULT_MAX_TOKENS: i32 = 1000;

/// Sampling temperature (Converse requests only)
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!("Invalid environment: {}. Expected: development, staging, or production", s),
        }
    }
}

/// Request/response schema family of a Bedrock model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Anthropic Messages body sent through `InvokeModel`
    Anthropic,
    /// Everything else, sent through the Converse API
    Converse,
}

impl ModelFamily {
    /// Classify a model identifier.
    ///
    /// Any identifier containing `anthropic` (case-insensitive) uses the
    /// Anthropic schema; all others use Converse.
    pub fn classify(model_id: &str) -> Self {
        if model_id.to_lowercase().contains("anthropic") {
            ModelFamily::Anthropic
        } else {
            ModelFamily::Converse
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::Anthropic => write!(f, "anthropic"),
            ModelFamily::Converse => write!(f, "converse"),
        }
    }
}

/// A model identifier together with its family, classified once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTarget {
    id: String,
    family: ModelFamily,
}

impl ModelTarget {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let family = ModelFamily::classify(&id);
        Self { id, family }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }
}

/// Inference parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceParams {
    pub max_tokens: i32,
    pub temperature: f32,
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // Server settings
    pub host: String,
    pub port: u16,

    // AWS settings
    pub aws_region: String,
    pub bedrock_endpoint_url: Option<String>,

    // Model settings
    pub model: ModelTarget,
    pub inference: InferenceParams,
}

impl Settings {
    /// Load settings from environment variables with defaults.
    ///
    /// Not validated here: callers apply their overrides first and then call
    /// [`Settings::validate`] once.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Self {
            app_name: env_or_default("APP_NAME", "bedrock-query-proxy"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: env_or_default("ENVIRONMENT", "development")
                .parse()
                .unwrap_or_default(),
            log_level: env_or_default("LOG_LEVEL", "info"),

            host: env_or_default("HOST", "0.0.0.0"),
            port: env_or_default("PORT", "8000")
                .parse()
                .context("Invalid PORT value")?,

            aws_region: env_or_default("AWS_REGION", DEFAULT_REGION),
            bedrock_endpoint_url: env::var("BEDROCK_ENDPOINT_URL").ok(),

            model: ModelTarget::new(env_or_default("BEDROCK_MODEL_ID", DEFAULT_MODEL_ID)),
            inference: InferenceParams::default(),
        })
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.model.id().trim().is_empty() {
            anyhow::bail!("BEDROCK_MODEL_ID cannot be empty");
        }

        if self.inference.max_tokens <= 0 {
            anyhow::bail!("max_tokens must be > 0");
        }

        Ok(())
    }

    /// Replace the configured model, re-classifying its family
    pub fn set_model_id(&mut self, model_id: impl Into<String>) {
        self.model = ModelTarget::new(model_id);
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "bedrock-query-proxy".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            aws_region: DEFAULT_REGION.to_string(),
            bedrock_endpoint_url: None,
            model: ModelTarget::new(DEFAULT_MODEL_ID),
            inference: InferenceParams::default(),
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.app_name, "bedrock-query-proxy");
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.aws_region, "us-east-1");
        assert_eq!(settings.model.id(), DEFAULT_MODEL_ID);
        assert_eq!(settings.model.family(), ModelFamily::Anthropic);
    }

    #[test]
    fn test_default_inference_params() {
        let params = InferenceParams::default();
        assert_eq!(params.max_tokens, 1000);
        assert_eq!(params.temperature, 0.7_f32);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_model_family_classification() {
        assert_eq!(
            ModelFamily::classify("anthropic.claude-3-haiku-20240307-v1:0"),
            ModelFamily::Anthropic
        );
        assert_eq!(
            ModelFamily::classify("us.anthropic.claude-3-5-haiku-20241022-v1:0"),
            ModelFamily::Anthropic
        );
        assert_eq!(ModelFamily::classify("Custom-ANTHROPIC-Profile"), ModelFamily::Anthropic);
        assert_eq!(ModelFamily::classify("amazon.nova-micro-v1:0"), ModelFamily::Converse);
        // Only the substring counts, not what the model actually is
        assert_eq!(ModelFamily::classify("claude-3-haiku"), ModelFamily::Converse);
    }

    #[test]
    fn test_set_model_id_reclassifies() {
        let mut settings = Settings::default();
        settings.set_model_id("amazon.nova-lite-v1:0");
        assert_eq!(settings.model.id(), "amazon.nova-lite-v1:0");
        assert_eq!(settings.model.family(), ModelFamily::Converse);
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut settings = Settings::default();
        settings.set_model_id("  ");
        assert!(settings.validate().is_err());

        settings.set_model_id(DEFAULT_MODEL_ID);
        settings.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_defers_validation_to_caller() {
        let previous = env::var("BEDROCK_MODEL_ID").ok();
        env::set_var("BEDROCK_MODEL_ID", "");

        let loaded = Settings::load();

        match previous {
            Some(value) => env::set_var("BEDROCK_MODEL_ID", value),
            None => env::remove_var("BEDROCK_MODEL_ID"),
        }

        let mut settings = loaded.unwrap();
        assert!(settings.validate().is_err());

        // An override applied after loading makes the same settings valid
        settings.set_model_id("amazon.nova-micro-v1:0");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_addr() {
        let settings = Settings::default();
        assert_eq!(settings.server_addr(), "0.0.0.0:8000");
    }
}
