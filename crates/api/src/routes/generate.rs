//! Text generation route.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError};

/// Request body for `POST /generate-text`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Prompt forwarded verbatim to the model.
    pub prompt: String,
}

/// Response body for `POST /generate-text`.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Completion text.
    pub result: String,
}

/// Creates the text generation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/generate-text", post(generate_text))
}

async fn generate_text(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::validation(e.body_text()))?;

    let result = state.completion.complete(&request.prompt).await?;

    info!(
        prompt_len = request.prompt.len(),
        result_len = result.len(),
        "Generated text"
    );
    Ok(Json(GenerateResponse { result }))
}
