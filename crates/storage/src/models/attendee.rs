use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One roster row, keyed by employee number for upserts and by QR token for
/// check-in lookups.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendee {
    pub id: Uuid,
    pub employee_number: String,
    pub name: String,
    pub team: String,
    pub email: String,
    pub qr_token: String,
    pub qr_code_url: String,
    pub qr_code_storage_path: String,
    pub clothing_size: Option<String>,
    pub sports_team: Option<String>,
    /// Null until the attendee checks in; never reset afterwards.
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attendee {
    pub fn is_checked_in(&self) -> bool {
        self.checked_in_at.is_some()
    }
}

/// Fields written by an import or registration. The database assigns the row
/// id and keeps any existing `checked_in_at` on conflict.
#[derive(Debug, Clone)]
pub struct NewAttendee {
    pub employee_number: String,
    pub name: String,
    pub team: String,
    pub email: String,
    pub qr_token: String,
    pub qr_code_url: String,
    pub qr_code_storage_path: String,
    pub clothing_size: Option<String>,
    pub sports_team: Option<String>,
}
