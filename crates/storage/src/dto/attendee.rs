use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Attendee;

/// Request payload for registering a single attendee outside of a bulk
/// import.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttendeeRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Team is required"))]
    pub team: String,

    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, max = 64, message = "Employee number is required"))]
    pub employee_number: String,

    #[validate(length(max = 32))]
    pub clothing_size: Option<String>,

    #[validate(length(max = 255))]
    pub sports_team: Option<String>,
}

/// Roster row as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeResponse {
    pub id: Uuid,
    pub employee_number: String,
    pub name: String,
    pub team: String,
    pub email: String,
    pub qr_code_url: String,
    pub clothing_size: Option<String>,
    pub sports_team: Option<String>,
    pub is_checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Attendee> for AttendeeResponse {
    fn from(attendee: Attendee) -> Self {
        Self {
            is_checked_in: attendee.is_checked_in(),
            id: attendee.id,
            employee_number: attendee.employee_number,
            name: attendee.name,
            team: attendee.team,
            email: attendee.email,
            qr_code_url: attendee.qr_code_url,
            clothing_size: attendee.clothing_size,
            sports_team: attendee.sports_team,
            checked_in_at: attendee.checked_in_at,
            created_at: attendee.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterAttendeeResponse {
    pub success: bool,
    pub message: String,
    pub attendee: AttendeeResponse,
}
