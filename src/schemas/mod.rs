//! Schema module
//!
//! Envelope shapes exchanged with the invocation trigger and the two Bedrock
//! request/response schemas.

pub mod anthropic;
pub mod converse;
pub mod envelope;

pub use anthropic::{AnthropicRequest, AnthropicResponse, NO_RESPONSE_TEXT};
pub use converse::{ConverseReply, ConverseRequest};
pub use envelope::{InboundEnvelope, OutboundEnvelope, QueryResponseBody};
