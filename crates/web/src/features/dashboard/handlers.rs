use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::dashboard::DashboardStats;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Current attendance counters", body = DashboardStats)
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Response, WebError> {
    let stats = services::get_stats(state.db.pool()).await?;

    Ok(Json(stats).into_response())
}
