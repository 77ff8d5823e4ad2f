//! Request logging middleware
//!
//! Assigns each request a trace id (taken from `x-trace-id` or
//! `x-request-id` when the caller sends one), runs the request inside a span
//! carrying it, logs the outcome and echoes the id back in both headers.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for trace ID
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Header name for request ID (alias for trace ID)
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Trace id, also stored in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generate a new trace ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuse the caller's id when present
    pub fn from_headers(headers: &HeaderMap) -> Self {
        [TRACE_ID_HEADER, REQUEST_ID_HEADER]
            .iter()
            .find_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
            .filter(|id| !id.is_empty())
            .map(|id| Self(id.to_string()))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Middleware to log HTTP requests and responses
pub async fn log_request(mut request: Request, next: Next) -> Response<Body> {
    let start = Instant::now();
    let trace_id = TraceId::from_headers(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::info!(
        trace_id = %trace_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    request.extensions_mut().insert(trace_id.clone());

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %method,
        path = %path,
    );
    let mut response = next.run(request).instrument(span).await;

    let status = response.status();
    let duration_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);

    if status.is_server_error() {
        tracing::error!(trace_id = %trace_id, status = status.as_u16(), duration_ms = %duration_ms, "Server error");
    } else if status.is_client_error() {
        tracing::warn!(trace_id = %trace_id, status = status.as_u16(), duration_ms = %duration_ms, "Client error");
    } else {
        tracing::info!(trace_id = %trace_id, status = status.as_u16(), duration_ms = %duration_ms, "Request completed");
    }

    if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
        let headers = response.headers_mut();
        headers.insert(TRACE_ID_HEADER, value.clone());
        headers.insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_id_generation() {
        let trace_id = TraceId::new();
        // UUID v4 format: xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx
        assert_eq!(trace_id.as_str().len(), 36);
    }

    #[test]
    fn test_trace_id_prefers_trace_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-1"));
        assert_eq!(TraceId::from_headers(&headers).as_str(), "req-1");

        headers.insert(TRACE_ID_HEADER, HeaderValue::from_static("trace-1"));
        assert_eq!(TraceId::from_headers(&headers).as_str(), "trace-1");
    }

    #[test]
    fn test_trace_id_generated_when_absent() {
        let trace_id = TraceId::from_headers(&HeaderMap::new());
        assert_eq!(trace_id.as_str().len(), 36);
    }
}
