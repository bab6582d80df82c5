use axum::{Router, routing::get};

use super::handlers::{check_in, checkin_status};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(checkin_status).post(check_in))
}
