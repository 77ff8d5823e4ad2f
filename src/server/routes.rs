//! Application routing
//!
//! This module defines all HTTP routes for the application.

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{health, query};
use crate::middleware::logging::log_request;
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/liveness", get(health::liveness));

    let query_routes = Router::new()
        .route("/query", post(query::gateway_query))
        .route("/invoke", post(query::direct_invoke));

    Router::new()
        .merge(query_routes)
        .merge(health_routes)
        // Answers OPTIONS preflight with the same policy the envelopes advertise
        .layer(create_cors_layer())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::middleware::TRACE_ID_HEADER;
    use crate::schemas::envelope::{ErrorBody, OutboundEnvelope, QueryResponseBody};
    use crate::services::testing::{MockBackend, Scripted};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(script: Scripted) -> (Router, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::new(script));
        let state = AppState::with_backend(Settings::default(), backend.clone());
        (create_router(state), backend)
    }

    fn hello() -> Scripted {
        Scripted::Invoke(json!({"content": [{"text": "hello"}]}))
    }

    fn post_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_gateway_query_success() {
        let (router, _) = app(hello());

        let response = router
            .oneshot(post_request("/query", r#"{"query": "What is AWS?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(response.headers().contains_key(TRACE_ID_HEADER));

        let body: QueryResponseBody = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.query, "What is AWS?");
        assert_eq!(body.response, "hello");
        assert_eq!(body.model, "anthropic.claude-3-haiku-20240307-v1:0");
    }

    #[tokio::test]
    async fn test_gateway_query_without_query_is_bad_request() {
        let (router, backend) = app(hello());

        let response = router.oneshot(post_request("/query", "{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, r#"{"error":"Query is required"}"#);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_gateway_query_with_garbage_body_is_internal_error() {
        let (router, _) = app(hello());

        let response = router.oneshot(post_request("/query", "not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body.error.starts_with("Internal server error: "));
    }

    #[tokio::test]
    async fn test_gateway_query_with_invalid_utf8_is_internal_error() {
        let (router, backend) = app(hello());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b"{\"query\": \"caf\xff\"}".to_vec()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let body: ErrorBody = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body.error.starts_with("Internal server error: Invalid request envelope: "));
        assert_eq!(backend.call_count(), 0);
        assert!(backend.last_invoke().is_none());
    }

    #[tokio::test]
    async fn test_direct_invoke_returns_envelope() {
        let (router, _) = app(hello());

        let response = router
            .oneshot(post_request("/invoke", r#"{"body": "{\"query\": \"hi\"}"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope: OutboundEnvelope =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.headers["Access-Control-Allow-Methods"], "POST, OPTIONS");
        let body: QueryResponseBody = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(body.response, "hello");
    }

    #[tokio::test]
    async fn test_direct_invoke_validation_error_is_in_envelope() {
        let (router, _) = app(hello());

        let response = router.oneshot(post_request("/invoke", r#"{"query": ""}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(envelope["statusCode"], 400);
        assert_eq!(envelope["body"], r#"{"error":"Query is required"}"#);
    }

    #[tokio::test]
    async fn test_direct_invoke_with_non_json_payload() {
        let (router, backend) = app(hello());

        let response = router.oneshot(post_request("/invoke", "{")).await.unwrap();

        let envelope: OutboundEnvelope =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(envelope.status_code, 500);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_preflight_is_answered() {
        let (router, backend) = app(hello());

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/query")
            .header(header::ORIGIN, "https://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let methods = response.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("POST"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let (router, _) = app(hello());

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model_family"], "anthropic");
    }
}
