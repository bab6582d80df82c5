use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::post};

use super::handlers::upload;
use crate::state::AppState;

/// Uploaded rosters can exceed axum's 2 MB default body limit.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
