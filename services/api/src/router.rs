//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, WebSocket endpoint, OpenAPI documentation and the
//! CORS policy.

use crate::{
    config::CorsOrigin,
    handlers,
    models::{ChatRequest, ChatResponse, ChatTurn, ErrorResponse, WelcomeResponse},
    state::AppState,
    ws::ws_handler,
};

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::read_root, handlers::chat),
    components(schemas(ChatTurn, ChatRequest, ChatResponse, WelcomeResponse, ErrorResponse)),
    tags(
        (name = "Mind Search API", description = "Chat with a web research agent")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/", get(handlers::read_root))
        .route("/chat", post(handlers::chat))
        .route("/ws", get(ws_handler))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}

/// Builds the CORS policy for the configured frontend origin.
///
/// A wildcard origin cannot be combined with credentials, so credentials are
/// only allowed for an exact origin; methods and headers are then mirrored.
pub fn cors_layer(origin: &CorsOrigin) -> CorsLayer {
    match origin {
        CorsOrigin::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigin::Exact(url) => match HeaderValue::from_str(url) {
            Ok(value) => CorsLayer::new()
                .allow_origin(AllowOrigin::exact(value))
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true),
            Err(e) => {
                warn!(origin = %url, error = %e, "Unusable CORS origin; allowing any origin");
                cors_layer(&CorsOrigin::Any)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockAgent;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use mind_search_core::{AgentError, AgentOutput};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(agent: MockAgent) -> Router {
        create_router(Arc::new(AppState::new(Arc::new(agent))))
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(resp.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_chat(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_returns_welcome_message() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app(MockAgent::new()).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            json!({"message": "Welcome to Mind Search API"})
        );
    }

    #[tokio::test]
    async fn test_chat_returns_answer_with_empty_sources() {
        let mut agent = MockAgent::new();
        agent
            .expect_invoke()
            .withf(|query: &str| query == "ping")
            .times(1)
            .returning(|_| Ok(AgentOutput::from("pong")));

        let resp = app(agent)
            .oneshot(post_chat(json!({"message": "ping"}).to_string()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert!(body["answer"].is_string());
        assert_eq!(body["sources"], json!([]));
    }

    #[tokio::test]
    async fn test_chat_agent_failure_returns_500_with_detail() {
        let mut agent = MockAgent::new();
        agent
            .expect_invoke()
            .returning(|_| Err(AgentError::Failed("boom".to_string())));

        let resp = app(agent)
            .oneshot(post_chat(json!({"message": "ping"}).to_string()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({"detail": "boom"}));
    }

    #[tokio::test]
    async fn test_chat_malformed_body_returns_422() {
        let mut agent = MockAgent::new();
        agent.expect_invoke().never();

        let resp = app(agent)
            .oneshot(post_chat(json!({"history": []}).to_string()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_json(resp).await["detail"].is_string());
    }

    #[tokio::test]
    async fn test_ws_route_requires_upgrade() {
        let req = Request::builder().uri("/ws").body(Body::empty()).unwrap();
        let resp = app(MockAgent::new()).oneshot(req).await.unwrap();

        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn test_openapi_document_lists_chat() {
        let req = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();
        let resp = app(MockAgent::new()).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let doc = body_json(resp).await;
        assert!(doc["paths"]["/chat"]["post"].is_object());
        assert!(doc["paths"]["/"]["get"].is_object());
    }

    #[tokio::test]
    async fn test_exact_cors_origin_is_echoed() {
        let origin = "https://mind-search.example.com";
        let router = app(MockAgent::new()).layer(cors_layer(&CorsOrigin::Exact(origin.into())));

        let req = Request::builder()
            .uri("/")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();

        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            origin
        );
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_wildcard_cors_origin() {
        let router = app(MockAgent::new()).layer(cors_layer(&CorsOrigin::Any));

        let req = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://anywhere.example.org")
            .body(Body::empty())
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();

        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
