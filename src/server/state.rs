//! Application state container
//!
//! Shared, read-only state passed to every request handler via Axum's
//! state extraction.

use crate::config::{create_bedrock_client, Settings};
use crate::services::{BedrockBackend, InferenceBackend, ModelInvoker, QueryHandler};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Query handler bound to the configured model
    pub handler: Arc<QueryHandler>,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    /// Create the application state with a Bedrock-backed handler
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        tracing::debug!(
            region = %settings.aws_region,
            bedrock_endpoint = ?settings.bedrock_endpoint_url,
            "Creating Bedrock client"
        );
        let client = create_bedrock_client(&settings).await;

        Ok(Self::with_backend(settings, Arc::new(BedrockBackend::new(client))))
    }

    /// Create the application state on top of an arbitrary backend
    pub fn with_backend(settings: Settings, backend: Arc<dyn InferenceBackend>) -> Self {
        let settings = Arc::new(settings);
        let invoker = ModelInvoker::new(backend, settings.inference);
        let handler = Arc::new(QueryHandler::new(invoker, settings.model.clone()));

        tracing::info!(
            model_id = %settings.model.id(),
            family = %settings.model.family(),
            "Application state initialized"
        );

        Self {
            settings,
            handler,
            start_time: Instant::now(),
        }
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
