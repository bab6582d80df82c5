use sqlx::PgPool;
use storage::{
    dto::dashboard::DashboardStats, error::Result, repository::attendee::AttendeeRepository,
};

/// Attendance counters for the polling dashboard.
pub async fn get_stats(pool: &PgPool) -> Result<DashboardStats> {
    let repo = AttendeeRepository::new(pool);

    let total = repo.count_total().await?;
    let checked_in = repo.count_checked_in().await?;

    Ok(DashboardStats::from_counts(total, checked_in))
}
