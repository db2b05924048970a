//! File upload route.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    routing::post,
};
use serde::Serialize;
use tracing::info;

use crate::{AppState, error::ApiError, intake::receive_file};

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Response body for `POST /upload`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Remote object id.
    pub file_id: String,
    /// Public direct-access link.
    pub url: String,
}

/// Creates the upload routes, capping request bodies near `max_file_size`.
pub fn routes(max_file_size: u64) -> Router<AppState> {
    let limit = usize::try_from(max_file_size.saturating_add(MULTIPART_OVERHEAD))
        .unwrap_or(usize::MAX);
    Router::new()
        .route("/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(limit))
}

async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::validation(e.body_text()))?;
    let file = receive_file(multipart, &state.upload_policy, &state.temp_dir).await?;

    let published = state.orchestrator.publish(file).await?;

    info!(object_id = %published.object_id, "Upload served");
    Ok(Json(UploadResponse {
        file_id: published.object_id,
        url: published.direct_link,
    }))
}
