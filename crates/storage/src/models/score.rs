use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One (event, team) score entry. Resubmitting the same pair overwrites rank
/// and score.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Score {
    pub id: Uuid,
    pub event_name: String,
    pub team_name: String,
    pub rank: i32,
    pub score: i32,
    pub updated_at: DateTime<Utc>,
}
