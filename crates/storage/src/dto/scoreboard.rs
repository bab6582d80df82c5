use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Score;

/// Request payload for entering one event/team result. Same pair submitted
/// again overwrites the previous rank and score.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    #[validate(length(min = 1, max = 255, message = "Event name is required"))]
    pub event_name: String,

    #[validate(length(min = 1, max = 255, message = "Team name is required"))]
    pub team_name: String,

    #[validate(range(min = 1, message = "Rank must be at least 1"))]
    pub rank: i32,

    #[validate(range(min = 0, message = "Score cannot be negative"))]
    pub score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamTotal {
    pub team: String,
    pub total: i32,
}

/// Full scoreboard matrix plus the fixed event and team orderings the board
/// is rendered in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardResponse {
    pub scores: Vec<Score>,
    pub team_totals: Vec<TeamTotal>,
    pub events: Vec<String>,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitScoreResponse {
    pub success: bool,
    pub message: String,
    pub data: Score,
}
