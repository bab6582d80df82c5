use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Base URL of the blob-store service (Supabase-compatible storage API).
    pub storage_url: String,
    pub storage_service_key: String,
    pub qr_bucket: String,
    /// Public base URL of the app; check-in links are built against it.
    pub app_url: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_from_email: String,
    /// When set, every outgoing mail is redirected here. Meant for
    /// non-production runs against a real roster.
    pub test_email: Option<String>,
    /// Rows processed concurrently per import chunk.
    pub import_batch_size: usize,
    /// Emails delivered per SMTP session.
    pub email_batch_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            storage_url: std::env::var("STORAGE_URL")
                .context("Cannot load STORAGE_URL env variable")?,
            storage_service_key: std::env::var("STORAGE_SERVICE_KEY")
                .context("Cannot load STORAGE_SERVICE_KEY env variable")?,
            qr_bucket: std::env::var("QR_BUCKET").unwrap_or_else(|_| "qr-codes".to_string()),
            app_url: std::env::var("APP_URL").context("Cannot load APP_URL env variable")?,
            smtp_server: std::env::var("SMTP_SERVER")
                .unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: std::env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT must be a number")?,
            smtp_username: std::env::var("SMTP_USERNAME")
                .context("Cannot load SMTP_USERNAME env variable")?,
            smtp_password: std::env::var("SMTP_PASSWORD")
                .context("Cannot load SMTP_PASSWORD env variable")?,
            smtp_from_email: std::env::var("SMTP_FROM_EMAIL")
                .context("Cannot load SMTP_FROM_EMAIL env variable")?,
            test_email: std::env::var("TEST_EMAIL").ok(),
            import_batch_size: std::env::var("IMPORT_BATCH_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("IMPORT_BATCH_SIZE must be a number")?,
            email_batch_size: std::env::var("EMAIL_BATCH_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("EMAIL_BATCH_SIZE must be a number")?,
        })
    }
}
