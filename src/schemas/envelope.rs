//! Inbound and outbound envelope definitions
//!
//! An inbound envelope arrives either in direct form (`{"query": "..."}`) or
//! in gateway form (`{"body": "{\"query\": \"...\"}"}`, where `body` may also
//! be an already-decoded object). The outbound envelope mirrors the gateway
//! proxy response shape: `{statusCode, headers, body}` with a JSON-string body.

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::HandlerError;

/// Headers attached to every outbound envelope, regardless of status
pub const RESPONSE_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
];

// ============================================================================
// Inbound
// ============================================================================

/// Inbound envelope, unwrapped to the JSON object that carries `query`
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEnvelope {
    payload: Map<String, Value>,
}

impl InboundEnvelope {
    /// Unwrap a raw invocation event.
    ///
    /// A string `body` is decoded as JSON; an object `body` is used as-is.
    /// Without `body` the event itself is the payload. The payload must end
    /// up as a JSON object.
    pub fn parse(event: Value) -> Result<Self, HandlerError> {
        let payload = match event {
            Value::Object(mut map) => match map.remove("body") {
                Some(Value::String(raw)) => serde_json::from_str(&raw)
                    .map_err(|e| HandlerError::Envelope(e.to_string()))?,
                Some(body) => body,
                None => Value::Object(map),
            },
            other => other,
        };

        match payload {
            Value::Object(payload) => Ok(Self { payload }),
            other => Err(HandlerError::Envelope(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// The `query` field, required to be a non-empty string
    pub fn query(&self) -> Result<&str, HandlerError> {
        self.payload
            .get("query")
            .and_then(Value::as_str)
            .filter(|query| !query.is_empty())
            .ok_or(HandlerError::Validation)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Outbound
// ============================================================================

/// Success body: the query, the generated text, and the configured model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponseBody {
    pub query: String,
    pub response: String,
    pub model: String,
}

/// Failure body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// Outbound envelope returned to the invocation trigger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutboundEnvelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded [`QueryResponseBody`] or [`ErrorBody`]
    pub body: String,
}

impl OutboundEnvelope {
    fn new<T: Serialize>(status: StatusCode, body: &T) -> Self {
        let body = serde_json::to_string(body).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("Internal server error: {}", e) }).to_string()
        });

        Self {
            status_code: status.as_u16(),
            headers: standard_headers(),
            body,
        }
    }

    /// 200 envelope carrying the generated text
    pub fn success(body: &QueryResponseBody) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Error envelope with the status and message derived from `err`
    pub fn from_error(err: &HandlerError) -> Self {
        Self::new(
            err.status_code(),
            &ErrorBody {
                error: err.client_message(),
            },
        )
    }
}

/// The fixed response headers as an owned map
pub fn standard_headers() -> BTreeMap<String, String> {
    RESPONSE_HEADERS
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Render an envelope as a real HTTP response (gateway proxy integration)
impl IntoResponse for OutboundEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Skipping invalid response header"),
            }
        }

        response
    }
}
