use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Attendee;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckinRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckinData {
    pub id: Uuid,
    pub name: String,
    pub team: String,
    pub employee_id: String,
    pub is_checked_in: bool,
    pub already_checked_in: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckinResponse {
    pub success: bool,
    pub data: CheckinData,
}

impl CheckinResponse {
    pub fn new(attendee: Attendee, already_checked_in: bool) -> Self {
        Self {
            success: true,
            data: CheckinData {
                is_checked_in: attendee.is_checked_in(),
                already_checked_in,
                id: attendee.id,
                name: attendee.name,
                team: attendee.team,
                employee_id: attendee.employee_number,
            },
        }
    }
}
