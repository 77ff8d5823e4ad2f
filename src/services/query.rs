//! Query handler
//!
//! Turns an inbound envelope into an outbound envelope: unwrap, validate,
//! invoke the model, format. Every failure becomes an error envelope.

use serde_json::Value;

use super::invoker::ModelInvoker;
use crate::config::ModelTarget;
use crate::error::HandlerError;
use crate::schemas::{InboundEnvelope, OutboundEnvelope, QueryResponseBody};

/// Request adapter between the invocation trigger and the model invoker
#[derive(Clone)]
pub struct QueryHandler {
    invoker: ModelInvoker,
    model: ModelTarget,
}

impl QueryHandler {
    pub fn new(invoker: ModelInvoker, model: ModelTarget) -> Self {
        Self { invoker, model }
    }

    /// Handle one invocation event. Never fails: errors are rendered as
    /// 400/500 envelopes with the standard headers.
    pub async fn handle(&self, event: Value) -> OutboundEnvelope {
        tracing::info!(event = %event, "Received event");

        match self.process(event).await {
            Ok(body) => OutboundEnvelope::success(&body),
            Err(err) => {
                match &err {
                    HandlerError::Validation => {
                        tracing::info!("Rejected event without a query")
                    }
                    _ => tracing::error!(error = %err, "Error processing request"),
                }
                OutboundEnvelope::from_error(&err)
            }
        }
    }

    async fn process(&self, event: Value) -> Result<QueryResponseBody, HandlerError> {
        let envelope = InboundEnvelope::parse(event)?;
        let query = envelope.query()?;

        tracing::info!(query = %query, model_id = %self.model.id(), "Processing query");

        let response = self.invoker.invoke(query, &self.model).await?;

        Ok(QueryResponseBody {
            query: query.to_string(),
            response,
            model: self.model.id().to_string(),
        })
    }
}
