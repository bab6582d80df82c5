use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{list_attendees, manual_check_in, register_attendee};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendees).post(register_attendee))
        .route("/:id/checkin", post(manual_check_in))
}
