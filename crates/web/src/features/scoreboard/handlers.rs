use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::scoreboard::{
    ScoreSubmission, ScoreboardResponse, SubmitScoreResponse,
};
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/scoreboard",
    responses(
        (status = 200, description = "Full score matrix with team totals", body = ScoreboardResponse)
    ),
    tag = "scoreboard"
)]
pub async fn get_scoreboard(State(state): State<AppState>) -> Result<Response, WebError> {
    let scoreboard = services::get_scoreboard(&state.db).await?;

    Ok(Json(scoreboard).into_response())
}

#[utoipa::path(
    post,
    path = "/api/scoreboard/submit",
    request_body = ScoreSubmission,
    responses(
        (status = 200, description = "Score stored", body = SubmitScoreResponse),
        (status = 400, description = "Missing or invalid fields")
    ),
    tag = "scoreboard"
)]
pub async fn submit_score(
    State(state): State<AppState>,
    Json(submission): Json<ScoreSubmission>,
) -> Result<Response, WebError> {
    submission.validate()?;

    let score = services::submit_score(&state.db, &submission).await?;

    tracing::info!(
        event = %score.event_name,
        team = %score.team_name,
        rank = score.rank,
        points = score.score,
        "score recorded"
    );

    Ok(Json(SubmitScoreResponse {
        success: true,
        message: "Score recorded".to_string(),
        data: score,
    })
    .into_response())
}
