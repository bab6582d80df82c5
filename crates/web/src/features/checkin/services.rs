use storage::Database;
use storage::error::Result;
use storage::models::Attendee;
use storage::repository::attendee::AttendeeRepository;
use uuid::Uuid;

/// Check-in lookup/update boundary, so the idempotency rules run against
/// in-memory fakes in tests.
#[async_trait::async_trait]
pub trait CheckinStore: Send + Sync {
    async fn check_in_by_token(&self, token: &str) -> Result<Option<Attendee>>;
    async fn find_by_token(&self, token: &str) -> Result<Attendee>;
    async fn check_in_by_id(&self, id: Uuid) -> Result<Option<Attendee>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Attendee>;
}

#[async_trait::async_trait]
impl CheckinStore for Database {
    async fn check_in_by_token(&self, token: &str) -> Result<Option<Attendee>> {
        AttendeeRepository::new(self.pool())
            .check_in_by_token(token)
            .await
    }

    async fn find_by_token(&self, token: &str) -> Result<Attendee> {
        AttendeeRepository::new(self.pool()).find_by_token(token).await
    }

    async fn check_in_by_id(&self, id: Uuid) -> Result<Option<Attendee>> {
        AttendeeRepository::new(self.pool()).check_in_by_id(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Attendee> {
        AttendeeRepository::new(self.pool()).find_by_id(id).await
    }
}

/// Mark the attendee behind `token` as checked in, exactly once.
///
/// The conditional update only matches a row whose timestamp is still null,
/// so concurrent scans of the same code serialize on the store: the first
/// writer wins and every later caller lands in the already-checked-in
/// branch. Returns the attendee and whether they had checked in before.
pub async fn check_in(store: &dyn CheckinStore, token: &str) -> Result<(Attendee, bool)> {
    if let Some(attendee) = store.check_in_by_token(token).await? {
        return Ok((attendee, false));
    }

    // No un-checked-in row matched: either already checked in, or the token
    // is unknown (NotFound).
    let attendee = store.find_by_token(token).await?;
    Ok((attendee, true))
}

/// Read-only status lookup for a token.
pub async fn status(store: &dyn CheckinStore, token: &str) -> Result<Attendee> {
    store.find_by_token(token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;
    use storage::error::StorageError;

    fn attendee(token: &str) -> Attendee {
        let now = Utc::now();
        Attendee {
            id: Uuid::new_v4(),
            employee_number: "10001".to_string(),
            name: "홍길동".to_string(),
            team: "개발팀".to_string(),
            email: "hong@example.com".to_string(),
            qr_token: token.to_string(),
            qr_code_url: "https://blob.test/team/10001.png".to_string(),
            qr_code_storage_path: "team/10001.png".to_string(),
            clothing_size: None,
            sports_team: None,
            checked_in_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    struct MemoryCheckins {
        rows: Mutex<Vec<Attendee>>,
    }

    impl MemoryCheckins {
        fn with(rows: Vec<Attendee>) -> Self {
            Self {
                rows: Mutex::new(rows),
            }
        }
    }

    #[async_trait::async_trait]
    impl CheckinStore for MemoryCheckins {
        async fn check_in_by_token(&self, token: &str) -> Result<Option<Attendee>> {
            let mut rows = self.rows.lock().unwrap();
            for row in rows.iter_mut() {
                // Same conditional-update semantics as the database: only an
                // un-checked-in row matches.
                if row.qr_token == token && row.checked_in_at.is_none() {
                    row.checked_in_at = Some(Utc::now());
                    return Ok(Some(row.clone()));
                }
            }
            Ok(None)
        }

        async fn find_by_token(&self, token: &str) -> Result<Attendee> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.qr_token == token)
                .cloned()
                .ok_or(StorageError::NotFound)
        }

        async fn check_in_by_id(&self, id: Uuid) -> Result<Option<Attendee>> {
            let mut rows = self.rows.lock().unwrap();
            for row in rows.iter_mut() {
                if row.id == id && row.checked_in_at.is_none() {
                    row.checked_in_at = Some(Utc::now());
                    return Ok(Some(row.clone()));
                }
            }
            Ok(None)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Attendee> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or(StorageError::NotFound)
        }
    }

    #[tokio::test]
    async fn first_scan_sets_the_timestamp() {
        let store = MemoryCheckins::with(vec![attendee("abc123XY")]);

        let (checked, already_checked_in) = check_in(&store, "abc123XY").await.unwrap();

        assert!(!already_checked_in);
        assert!(checked.is_checked_in());
    }

    #[tokio::test]
    async fn repeat_scan_is_a_flagged_noop() {
        let store = MemoryCheckins::with(vec![attendee("abc123XY")]);

        let (first, _) = check_in(&store, "abc123XY").await.unwrap();
        let (second, already_checked_in) = check_in(&store, "abc123XY").await.unwrap();

        assert!(already_checked_in);
        // The original timestamp survives the repeat.
        assert_eq!(second.checked_in_at, first.checked_in_at);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let store = MemoryCheckins::with(vec![attendee("abc123XY")]);

        let result = check_in(&store, "nosuchtk").await;

        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn status_lookup_does_not_check_anyone_in() {
        let store = MemoryCheckins::with(vec![attendee("abc123XY")]);

        let looked_up = status(&store, "abc123XY").await.unwrap();
        assert!(!looked_up.is_checked_in());

        // Still un-checked-in afterwards.
        let (_, already_checked_in) = check_in(&store, "abc123XY").await.unwrap();
        assert!(!already_checked_in);
    }
}
