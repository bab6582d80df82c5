use sqlx::PgPool;

use crate::dto::scoreboard::ScoreSubmission;
use crate::error::Result;
use crate::models::Score;

pub struct ScoreboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreboardRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All score entries ordered for rendering: by event, then rank.
    pub async fn list(&self) -> Result<Vec<Score>> {
        let scores = sqlx::query_as::<_, Score>(
            r#"
            SELECT id, event_name, team_name, rank, score, updated_at
            FROM scoreboard
            ORDER BY event_name ASC, rank ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(scores)
    }

    /// Upsert keyed by (event_name, team_name): resubmitting a pair replaces
    /// its rank and score rather than appending a second row.
    pub async fn upsert(&self, submission: &ScoreSubmission) -> Result<Score> {
        let score = sqlx::query_as::<_, Score>(
            r#"
            INSERT INTO scoreboard (event_name, team_name, rank, score)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (event_name, team_name) DO UPDATE SET
                rank = EXCLUDED.rank,
                score = EXCLUDED.score,
                updated_at = now()
            RETURNING id, event_name, team_name, rank, score, updated_at
            "#,
        )
        .bind(&submission.event_name)
        .bind(&submission.team_name)
        .bind(submission.rank)
        .bind(submission.score)
        .fetch_one(self.pool)
        .await?;

        Ok(score)
    }
}
