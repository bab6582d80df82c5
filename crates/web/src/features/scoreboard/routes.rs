use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{get_scoreboard, submit_score};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_scoreboard))
        .route("/submit", post(submit_score))
}
