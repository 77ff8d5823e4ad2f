//! Query endpoints
//!
//! `POST /query` behaves like a gateway proxy integration: the raw request
//! body becomes the envelope's `body` string and the outbound envelope is
//! rendered as the HTTP response. `POST /invoke` behaves like a direct
//! invocation: the request body is the whole event and the envelope itself
//! is returned as JSON.

use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};

use crate::error::HandlerError;
use crate::schemas::OutboundEnvelope;
use crate::server::state::AppState;

/// Gateway-style query endpoint
///
/// POST /query
pub async fn gateway_query(State(state): State<AppState>, body: Bytes) -> OutboundEnvelope {
    match String::from_utf8(body.to_vec()) {
        Ok(raw) => state.handler.handle(json!({ "body": raw })).await,
        Err(e) => {
            tracing::error!(error = %e, "Request body is not valid UTF-8");
            OutboundEnvelope::from_error(&HandlerError::Envelope(e.to_string()))
        }
    }
}

/// Direct invocation endpoint
///
/// POST /invoke
pub async fn direct_invoke(State(state): State<AppState>, body: Bytes) -> Json<OutboundEnvelope> {
    let envelope = match serde_json::from_slice::<Value>(&body) {
        Ok(event) => state.handler.handle(event).await,
        Err(e) => {
            tracing::error!(error = %e, "Invocation payload is not JSON");
            OutboundEnvelope::from_error(&HandlerError::Envelope(e.to_string()))
        }
    };

    Json(envelope)
}
