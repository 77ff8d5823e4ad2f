//! Error taxonomy for query handling and model invocation

use axum::http::StatusCode;
use thiserror::Error;

/// Failure while calling the model.
///
/// The first three variants are mapped from Bedrock service error codes;
/// `Unexpected` covers transport, request-building and decode failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error(
        "Access denied to Bedrock. Please ensure: \
         1) Model access is enabled in the AWS Console, \
         2) the execution role has bedrock:InvokeModel permission"
    )]
    PermissionDenied,

    #[error("Model not found: {model_id}. Please check the model ID.")]
    ModelNotFound { model_id: String },

    #[error("Bedrock error: {message}")]
    Provider { code: String, message: String },

    #[error("Unexpected error calling Bedrock: {0}")]
    Unexpected(String),
}

impl InvocationError {
    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            InvocationError::PermissionDenied => "permission_error",
            InvocationError::ModelNotFound { .. } => "not_found_error",
            InvocationError::Provider { .. } => "provider_error",
            InvocationError::Unexpected(_) => "invocation_error",
        }
    }
}

/// Failure while handling an inbound envelope
#[derive(Error, Debug)]
pub enum HandlerError {
    /// `query` missing, empty, or not a string
    #[error("Query is required")]
    Validation,

    /// Envelope could not be unwrapped into a JSON object
    #[error("Invalid request envelope: {0}")]
    Envelope(String),

    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

impl HandlerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::Validation => StatusCode::BAD_REQUEST,
            HandlerError::Envelope(_) | HandlerError::Invocation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the `error` field of the response body
    pub fn client_message(&self) -> String {
        match self {
            HandlerError::Validation => self.to_string(),
            _ => format!("Internal server error: {}", self),
        }
    }
}
