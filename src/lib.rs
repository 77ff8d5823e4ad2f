//! Bedrock query proxy library

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod schemas;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use config::{ModelFamily, ModelTarget, Settings};
pub use error::{HandlerError, InvocationError};
pub use schemas::{InboundEnvelope, OutboundEnvelope};
pub use server::{App, AppState};
pub use services::{BedrockBackend, InferenceBackend, ModelInvoker, QueryHandler};
