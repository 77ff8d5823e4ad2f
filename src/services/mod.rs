//! Services module
//!
//! Contains the query handling logic and the Bedrock integration.

pub mod bedrock;
pub mod invoker;
pub mod query;

#[cfg(test)]
pub(crate) mod testing;

pub use bedrock::{BackendError, BedrockBackend, InferenceBackend};
pub use invoker::{map_backend_error, ModelInvoker};
pub use query::QueryHandler;
