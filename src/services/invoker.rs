//! Model invoker
//!
//! Builds the request for the model's family, performs a single call through
//! the backend and extracts the generated text. No retries.

use std::sync::Arc;

use super::bedrock::{BackendError, InferenceBackend};
use crate::config::{InferenceParams, ModelFamily, ModelTarget};
use crate::error::InvocationError;
use crate::schemas::{AnthropicRequest, AnthropicResponse, ConverseRequest};

const ACCESS_DENIED: &str = "AccessDeniedException";
const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

/// Calls a model and returns its text answer
#[derive(Clone)]
pub struct ModelInvoker {
    backend: Arc<dyn InferenceBackend>,
    params: InferenceParams,
}

impl ModelInvoker {
    pub fn new(backend: Arc<dyn InferenceBackend>, params: InferenceParams) -> Self {
        Self { backend, params }
    }

    /// Send `query` to `model` and return the generated text.
    ///
    /// A successful call without usable text yields
    /// [`NO_RESPONSE_TEXT`](crate::schemas::NO_RESPONSE_TEXT).
    pub async fn invoke(&self, query: &str, model: &ModelTarget) -> Result<String, InvocationError> {
        let result = match model.family() {
            ModelFamily::Anthropic => self.invoke_anthropic(query, model).await,
            ModelFamily::Converse => self.invoke_converse(query, model).await,
        };

        if let Err(err) = &result {
            tracing::error!(
                model_id = %model.id(),
                family = %model.family(),
                error_kind = err.kind(),
                error = %err,
                "Bedrock invocation failed"
            );
        }

        result
    }

    async fn invoke_anthropic(
        &self,
        query: &str,
        model: &ModelTarget,
    ) -> Result<String, InvocationError> {
        let request = AnthropicRequest::user(query, self.params.max_tokens);
        let body = serde_json::to_vec(&request)
            .map_err(|e| InvocationError::Unexpected(format!("Failed to serialize request: {}", e)))?;

        let raw = self
            .backend
            .invoke_model(model.id(), body)
            .await
            .map_err(|e| map_backend_error(e, model))?;

        let response: AnthropicResponse = serde_json::from_slice(&raw)
            .map_err(|e| InvocationError::Unexpected(format!("Failed to parse response: {}", e)))?;

        Ok(response.into_text())
    }

    async fn invoke_converse(
        &self,
        query: &str,
        model: &ModelTarget,
    ) -> Result<String, InvocationError> {
        let request = ConverseRequest::user(model.id(), query, self.params);

        let reply = self
            .backend
            .converse(request)
            .await
            .map_err(|e| map_backend_error(e, model))?;

        Ok(reply.into_text())
    }
}

/// Map a backend failure onto the invocation error taxonomy
pub fn map_backend_error(err: BackendError, model: &ModelTarget) -> InvocationError {
    match err {
        BackendError::Service { code, message } => {
            tracing::warn!(code = %code, message = %message, "Bedrock service error");
            match code.as_str() {
                ACCESS_DENIED => InvocationError::PermissionDenied,
                RESOURCE_NOT_FOUND => InvocationError::ModelNotFound {
                    model_id: model.id().to_string(),
                },
                _ => InvocationError::Provider { code, message },
            }
        }
        BackendError::Client(message) => InvocationError::Unexpected(message),
    }
}
