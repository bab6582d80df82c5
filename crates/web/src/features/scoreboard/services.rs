use storage::{
    Database,
    dto::scoreboard::{ScoreSubmission, ScoreboardResponse, TeamTotal},
    error::Result,
    models::Score,
    repository::scoreboard::ScoreboardRepository,
};

/// Event names in board order.
pub const EVENTS: &[&str] = &[
    "글래디 에이터",
    "지네발 릴레이",
    "초대형 굴렁쇠",
    "도넛 릴레이",
    "박터트리기",
    "인간 컬링",
    "계주",
];

/// Team names in board order.
pub const TEAMS: &[&str] = &["빨강", "노랑", "초록", "파랑"];

/// Sum each team's scores across all events, keeping the fixed team order.
pub fn team_totals(scores: &[Score], teams: &[&str]) -> Vec<TeamTotal> {
    teams
        .iter()
        .map(|team| TeamTotal {
            team: team.to_string(),
            total: scores
                .iter()
                .filter(|s| s.team_name == *team)
                .map(|s| s.score)
                .sum(),
        })
        .collect()
}

/// Scoreboard read/write boundary, so the one-row-per-pair rule runs
/// against in-memory fakes in tests.
#[async_trait::async_trait]
pub trait ScoreStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Score>>;
    async fn upsert(&self, submission: &ScoreSubmission) -> Result<Score>;
}

#[async_trait::async_trait]
impl ScoreStore for Database {
    async fn list(&self) -> Result<Vec<Score>> {
        ScoreboardRepository::new(self.pool()).list().await
    }

    async fn upsert(&self, submission: &ScoreSubmission) -> Result<Score> {
        ScoreboardRepository::new(self.pool()).upsert(submission).await
    }
}

/// Full score matrix plus team totals for rendering.
pub async fn get_scoreboard(store: &dyn ScoreStore) -> Result<ScoreboardResponse> {
    let scores = store.list().await?;

    Ok(ScoreboardResponse {
        team_totals: team_totals(&scores, TEAMS),
        scores,
        events: EVENTS.iter().map(|e| e.to_string()).collect(),
        teams: TEAMS.iter().map(|t| t.to_string()).collect(),
    })
}

/// Upsert one event/team result.
pub async fn submit_score(store: &dyn ScoreStore, submission: &ScoreSubmission) -> Result<Score> {
    store.upsert(submission).await
}
