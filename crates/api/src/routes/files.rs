//! Remote file deletion route.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::delete,
};
use serde::Serialize;
use tracing::info;

use crate::{AppState, error::ApiError};

/// Response body for `DELETE /delete/{fileId}`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Status code reported by the storage service.
    pub status: u16,
}

/// Creates the file management routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/delete/{file_id}", delete(delete_file))
}

async fn delete_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let status = state.storage.delete(&file_id).await?;

    info!(object_id = %file_id, status, "Deleted remote file");
    Ok(Json(DeleteResponse { status }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestContext, read_json};
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn app(ctx: &TestContext) -> Router {
        Router::new().merge(routes()).with_state(ctx.state())
    }

    fn delete_request(id: &str) -> Request<Body> {
        Request::delete(format!("/delete/{id}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_delete_returns_storage_status() {
        let ctx = TestContext::new();

        let response = app(&ctx).oneshot(delete_request("abc123")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json, serde_json::json!({ "status": 204 }));
        assert_eq!(ctx.storage.calls(), vec!["delete"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_returns_404() {
        let ctx = TestContext::new();

        let response = app(&ctx).oneshot(delete_request("missing")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = read_json(response).await;
        assert_eq!(json["error"], "file not found: missing");
    }

    #[tokio::test]
    async fn test_delete_invalid_id_returns_400() {
        let ctx = TestContext::new();

        let response = app(&ctx).oneshot(delete_request("a.b")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "invalid object id: a.b");
    }
}
