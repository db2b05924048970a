//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The three relay endpoints plus a health probe
//! - Multipart intake into temporary files
//! - Mapping of domain errors onto `{"error": ...}` responses

pub mod error;
pub mod intake;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use courier_core::completion::CompletionClient;
use courier_core::storage::ObjectStorage;
use courier_core::upload::{UploadOrchestrator, UploadPolicy};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorResponse};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Remote storage client.
    pub storage: Arc<dyn ObjectStorage>,
    /// Language-model client.
    pub completion: Arc<dyn CompletionClient>,
    /// Upload pipeline over `storage`.
    pub orchestrator: Arc<UploadOrchestrator>,
    /// Intake limits for uploads.
    pub upload_policy: Arc<UploadPolicy>,
    /// Directory receiving temporary upload files.
    pub temp_dir: Arc<PathBuf>,
}

impl AppState {
    /// Wire the state from the two remote clients.
    #[must_use]
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        completion: Arc<dyn CompletionClient>,
        upload_policy: UploadPolicy,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        let orchestrator = Arc::new(UploadOrchestrator::new(Arc::clone(&storage)));
        Self {
            storage,
            completion,
            orchestrator,
            upload_policy: Arc::new(upload_policy),
            temp_dir: Arc::new(temp_dir.into()),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestContext, multipart_request, read_json};
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_serves_all_endpoints() {
        let ctx = TestContext::new();
        let app = create_router(ctx.state());

        let health = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);

        let upload = app
            .clone()
            .oneshot(multipart_request("file", "a.pdf", "application/pdf", b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(upload.status(), StatusCode::OK);
        assert_eq!(read_json(upload).await["fileId"], "abc123");

        let deleted = app
            .oneshot(Request::delete("/delete/abc123").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(read_json(deleted).await["status"], 204);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let ctx = TestContext::new();
        let app = create_router(ctx.state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/generate-text")
                    .header("Origin", "https://app.example.com")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let ctx = TestContext::new();
        let app = create_router(ctx.state());

        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
