use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::{
    attendee::{AttendeeResponse, RegisterAttendeeRequest, RegisterAttendeeResponse},
    checkin::CheckinResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::features::import::services::{ImportDeps, ProvisionError};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/attendees",
    responses(
        (status = 200, description = "Full roster, newest first", body = Vec<AttendeeResponse>)
    ),
    tag = "attendees"
)]
pub async fn list_attendees(State(state): State<AppState>) -> Result<Response, WebError> {
    let attendees = services::list_attendees(state.db.pool()).await?;

    let response: Vec<AttendeeResponse> =
        attendees.into_iter().map(AttendeeResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/attendees",
    request_body = RegisterAttendeeRequest,
    responses(
        (status = 201, description = "Attendee registered", body = RegisterAttendeeResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "attendees"
)]
pub async fn register_attendee(
    State(state): State<AppState>,
    Json(req): Json<RegisterAttendeeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let deps = ImportDeps {
        roster: &state.db,
        blob: state.blob.as_ref(),
        app_url: &state.config.app_url,
    };

    let provisioned = services::register_attendee(&deps, &req)
        .await
        .map_err(|e| match e {
            ProvisionError::Storage(e) => WebError::Storage(e),
            other => WebError::InternalServerError(other.to_string()),
        })?;

    tracing::info!(
        name = %provisioned.attendee.name,
        employee_number = %provisioned.attendee.employee_number,
        "attendee registered"
    );

    // Delivery is best-effort here too; the roster write already committed.
    if let Err(e) = state.mailer.send(&provisioned.email).await {
        tracing::warn!(
            to = %provisioned.email.to,
            "failed to send QR email to new attendee: {}",
            e
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterAttendeeResponse {
            success: true,
            message: "Attendee registered".to_string(),
            attendee: AttendeeResponse::from(provisioned.attendee),
        }),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/attendees/{id}/checkin",
    params(
        ("id" = Uuid, Path, description = "Attendee row id")
    ),
    responses(
        (status = 200, description = "Checked in, or already checked in", body = CheckinResponse),
        (status = 404, description = "Unknown attendee")
    ),
    tag = "attendees"
)]
pub async fn manual_check_in(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let (attendee, already_checked_in) = services::manual_check_in(&state.db, id).await?;

    tracing::info!(
        name = %attendee.name,
        already_checked_in,
        "manual check-in processed"
    );

    Ok(Json(CheckinResponse::new(attendee, already_checked_in)).into_response())
}
