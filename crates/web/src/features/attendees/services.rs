use sqlx::PgPool;
use storage::{
    dto::attendee::RegisterAttendeeRequest, error::Result, models::Attendee,
    repository::attendee::AttendeeRepository,
};
use uuid::Uuid;

use crate::features::checkin::services::CheckinStore;
use crate::features::import::services::{
    ImportDeps, NormalizedEmployee, ProvisionError, ProvisionedRow, provision,
};

/// Full roster, newest registrations first.
pub async fn list_attendees(pool: &PgPool) -> Result<Vec<Attendee>> {
    let repo = AttendeeRepository::new(pool);
    repo.list().await
}

/// Register one attendee through the same token → QR → publish → upsert
/// pipeline the bulk import uses.
pub async fn register_attendee(
    deps: &ImportDeps<'_>,
    request: &RegisterAttendeeRequest,
) -> std::result::Result<ProvisionedRow, ProvisionError> {
    let employee = NormalizedEmployee {
        name: request.name.trim().to_string(),
        team: request.team.trim().to_string(),
        email: request.email.trim().to_string(),
        employee_number: request.employee_number.trim().to_string(),
        clothing_size: request
            .clothing_size
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        sports_team: request
            .sports_team
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
    };

    provision(deps, &employee).await
}

/// Manual check-in override by row id, with the same idempotent semantics
/// as the token path: a repeat is a flagged no-op.
pub async fn manual_check_in(store: &dyn CheckinStore, id: Uuid) -> Result<(Attendee, bool)> {
    if let Some(attendee) = store.check_in_by_id(id).await? {
        return Ok((attendee, false));
    }

    let attendee = store.find_by_id(id).await?;
    Ok((attendee, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;
    use storage::error::StorageError;

    fn attendee() -> Attendee {
        let now = Utc::now();
        Attendee {
            id: Uuid::new_v4(),
            employee_number: "10001".to_string(),
            name: "홍길동".to_string(),
            team: "개발팀".to_string(),
            email: "hong@example.com".to_string(),
            qr_token: "abc123XY".to_string(),
            qr_code_url: "https://blob.test/team/10001.png".to_string(),
            qr_code_storage_path: "team/10001.png".to_string(),
            clothing_size: None,
            sports_team: None,
            checked_in_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    struct SingleAttendee {
        row: Mutex<Attendee>,
    }

    #[async_trait::async_trait]
    impl CheckinStore for SingleAttendee {
        async fn check_in_by_token(&self, _token: &str) -> Result<Option<Attendee>> {
            Ok(None)
        }

        async fn find_by_token(&self, _token: &str) -> Result<Attendee> {
            Err(StorageError::NotFound)
        }

        async fn check_in_by_id(&self, id: Uuid) -> Result<Option<Attendee>> {
            let mut row = self.row.lock().unwrap();
            if row.id == id && row.checked_in_at.is_none() {
                row.checked_in_at = Some(Utc::now());
                return Ok(Some(row.clone()));
            }
            Ok(None)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Attendee> {
            let row = self.row.lock().unwrap();
            if row.id == id {
                Ok(row.clone())
            } else {
                Err(StorageError::NotFound)
            }
        }
    }

    #[tokio::test]
    async fn manual_override_is_idempotent() {
        let row = attendee();
        let id = row.id;
        let store = SingleAttendee {
            row: Mutex::new(row),
        };

        let (first, already) = manual_check_in(&store, id).await.unwrap();
        assert!(!already);
        assert!(first.is_checked_in());

        let (second, already) = manual_check_in(&store, id).await.unwrap();
        assert!(already);
        assert_eq!(second.checked_in_at, first.checked_in_at);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = SingleAttendee {
            row: Mutex::new(attendee()),
        };

        let result = manual_check_in(&store, Uuid::new_v4()).await;

        assert!(matches!(result, Err(StorageError::NotFound)));
    }
}
