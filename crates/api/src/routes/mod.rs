//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod files;
pub mod generate;
pub mod health;
pub mod upload;

/// Creates the API router with all routes.
///
/// The upload route carries a body limit derived from the upload policy, so
/// the router needs the state up front.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(generate::routes())
        .merge(upload::routes(state.upload_policy.max_file_size))
        .merge(files::routes())
}
