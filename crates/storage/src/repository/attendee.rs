use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Attendee, NewAttendee};

const ATTENDEE_COLUMNS: &str = "id, employee_number, name, team, email, qr_token, \
     qr_code_url, qr_code_storage_path, clothing_size, sports_team, \
     checked_in_at, created_at, updated_at";

pub struct AttendeeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AttendeeRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the full roster, newest registrations first.
    pub async fn list(&self) -> Result<Vec<Attendee>> {
        let attendees = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(attendees)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Attendee> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE qr_token = $1"
        ))
        .bind(token)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(attendee)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Attendee> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(attendee)
    }

    /// Insert or update keyed by employee number. A re-import overwrites the
    /// mutable fields but keeps the row id and any `checked_in_at` already
    /// set.
    pub async fn upsert(&self, new: &NewAttendee) -> Result<Attendee> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            r#"
            INSERT INTO attendees
                (employee_number, name, team, email, qr_token,
                 qr_code_url, qr_code_storage_path, clothing_size, sports_team)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (employee_number) DO UPDATE SET
                name = EXCLUDED.name,
                team = EXCLUDED.team,
                email = EXCLUDED.email,
                qr_token = EXCLUDED.qr_token,
                qr_code_url = EXCLUDED.qr_code_url,
                qr_code_storage_path = EXCLUDED.qr_code_storage_path,
                clothing_size = EXCLUDED.clothing_size,
                sports_team = EXCLUDED.sports_team,
                updated_at = now()
            RETURNING {ATTENDEE_COLUMNS}
            "#
        ))
        .bind(&new.employee_number)
        .bind(&new.name)
        .bind(&new.team)
        .bind(&new.email)
        .bind(&new.qr_token)
        .bind(&new.qr_code_url)
        .bind(&new.qr_code_storage_path)
        .bind(&new.clothing_size)
        .bind(&new.sports_team)
        .fetch_one(self.pool)
        .await?;

        Ok(attendee)
    }

    /// Set the check-in timestamp if it is still null. Returns `None` when no
    /// un-checked-in row matched the token, which the caller disambiguates
    /// into "already checked in" or "unknown token".
    pub async fn check_in_by_token(&self, token: &str) -> Result<Option<Attendee>> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            r#"
            UPDATE attendees
            SET checked_in_at = now(), updated_at = now()
            WHERE qr_token = $1 AND checked_in_at IS NULL
            RETURNING {ATTENDEE_COLUMNS}
            "#
        ))
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(attendee)
    }

    /// Manual-override variant of [`check_in_by_token`], keyed by row id.
    ///
    /// [`check_in_by_token`]: Self::check_in_by_token
    pub async fn check_in_by_id(&self, id: Uuid) -> Result<Option<Attendee>> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            r#"
            UPDATE attendees
            SET checked_in_at = now(), updated_at = now()
            WHERE id = $1 AND checked_in_at IS NULL
            RETURNING {ATTENDEE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(attendee)
    }

    pub async fn count_total(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendees")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    pub async fn count_checked_in(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM attendees WHERE checked_in_at IS NOT NULL",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
