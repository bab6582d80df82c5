use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::dto::checkin::{CheckinRequest, CheckinResponse};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/checkin",
    request_body = CheckinRequest,
    responses(
        (status = 200, description = "Checked in, or already checked in", body = CheckinResponse),
        (status = 400, description = "Missing token"),
        (status = 404, description = "Unknown token")
    ),
    tag = "checkin"
)]
pub async fn check_in(
    State(state): State<AppState>,
    Json(req): Json<CheckinRequest>,
) -> Result<Response, WebError> {
    let token = req.token.trim();
    if token.is_empty() {
        return Err(WebError::BadRequest("Token is required".to_string()));
    }

    let (attendee, already_checked_in) = services::check_in(&state.db, token).await?;

    tracing::info!(
        name = %attendee.name,
        employee_number = %attendee.employee_number,
        already_checked_in,
        "check-in processed"
    );

    Ok(Json(CheckinResponse::new(attendee, already_checked_in)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub token: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/checkin",
    params(
        ("token" = String, Query, description = "Check-in token to look up")
    ),
    responses(
        (status = 200, description = "Current check-in status", body = CheckinResponse),
        (status = 400, description = "Missing token"),
        (status = 404, description = "Unknown token")
    ),
    tag = "checkin"
)]
pub async fn checkin_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, WebError> {
    let token = query
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| WebError::BadRequest("Token is required".to_string()))?;

    let attendee = services::status(&state.db, token).await?;
    let already = attendee.is_checked_in();

    Ok(Json(CheckinResponse::new(attendee, already)).into_response())
}
