//! Bedrock service for AWS Bedrock API interactions
//!
//! [`InferenceBackend`] is the provider capability the invoker depends on:
//! a raw `InvokeModel` call and a `Converse` call. [`BedrockBackend`]
//! implements it on top of the AWS SDK client.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::{
    primitives::Blob,
    types::{ContentBlock, ConversationRole, InferenceConfiguration, Message as BedrockMessage},
    Client as BedrockRuntimeClient,
};
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::{display::DisplayErrorContext, metadata::ProvideErrorMetadata};

use crate::schemas::converse::{
    ConverseReply, ConverseReplyContent, ConverseReplyMessage, ConverseReplyOutput,
    ConverseRequest,
};

/// Errors surfaced by an inference backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The service answered with a modeled error
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// The request never produced a service answer (build, dispatch,
    /// timeout, or response decoding failure)
    #[error("{0}")]
    Client(String),
}

impl BackendError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Service error code, if the service answered
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::Service { code, .. } => Some(code),
            BackendError::Client(_) => None,
        }
    }

    /// Convert an SDK error, keeping the service error code when there is one
    pub fn from_sdk_error<E, R>(err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        match &err {
            SdkError::ServiceError(service_err) => {
                let error = service_err.err();
                BackendError::Service {
                    code: error.code().unwrap_or("Unknown").to_string(),
                    message: error
                        .message()
                        .map(str::to_string)
                        .unwrap_or_else(|| error.to_string()),
                }
            }
            _ => BackendError::Client(DisplayErrorContext(&err).to_string()),
        }
    }
}

/// Remote inference capability
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Send a raw JSON body through `InvokeModel`, returning the raw response body
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, BackendError>;

    /// Call the Converse API
    async fn converse(&self, request: ConverseRequest) -> Result<ConverseReply, BackendError>;
}

/// [`InferenceBackend`] backed by the AWS Bedrock Runtime SDK client
#[derive(Clone)]
pub struct BedrockBackend {
    client: BedrockRuntimeClient,
}

impl BedrockBackend {
    pub fn new(client: BedrockRuntimeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InferenceBackend for BedrockBackend {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, BackendError> {
        tracing::debug!(model_id = %model_id, bytes = body.len(), "Calling Bedrock InvokeModel API");

        let output = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(BackendError::from_sdk_error)?;

        Ok(output.body.into_inner())
    }

    async fn converse(&self, request: ConverseRequest) -> Result<ConverseReply, BackendError> {
        tracing::debug!(
            model_id = %request.model_id,
            message_count = request.messages.len(),
            "Calling Bedrock Converse API"
        );

        let messages = request
            .messages
            .into_iter()
            .map(|message| {
                let role = ConversationRole::from(message.role.as_str());
                let content = message
                    .content
                    .into_iter()
                    .map(|block| ContentBlock::Text(block.text))
                    .collect();
                BedrockMessage::builder()
                    .role(role)
                    .set_content(Some(content))
                    .build()
                    .map_err(|e| BackendError::Client(format!("Invalid Converse message: {}", e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let inference_config = InferenceConfiguration::builder()
            .max_tokens(request.inference_config.max_tokens)
            .temperature(request.inference_config.temperature)
            .build();

        let result = self
            .client
            .converse()
            .model_id(&request.model_id)
            .set_messages(Some(messages))
            .inference_config(inference_config)
            .send()
            .await
            .map_err(BackendError::from_sdk_error)?;

        tracing::debug!(
            stop_reason = ?result.stop_reason(),
            "Bedrock Converse API call completed"
        );

        let message = result
            .output()
            .and_then(|output| output.as_message().ok())
            .map(|message| ConverseReplyMessage {
                content: message
                    .content()
                    .iter()
                    .map(|block| ConverseReplyContent {
                        text: block.as_text().ok().cloned(),
                    })
                    .collect(),
            });

        Ok(ConverseReply {
            output: Some(ConverseReplyOutput { message }),
        })
    }
}
