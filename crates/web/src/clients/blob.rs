use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Storage rejected upload ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Blob-store boundary. Uploads overwrite, so re-imports of the same
/// employee converge to a single object.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<(), BlobError>;

    fn public_url(&self, path: &str) -> String;
}

/// Production store speaking the Supabase storage HTTP API.
pub struct SupabaseStorage {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

impl SupabaseStorage {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.storage_url.trim_end_matches('/').to_string(),
            bucket: config.qr_bucket.clone(),
            service_key: config.storage_service_key.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for SupabaseStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("x-upsert", "true")
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

/// Turn a team name into a safe path segment. Names containing non-Latin
/// script are base64url-encoded whole under a `team_` marker so the original
/// name stays uniquely recoverable; Latin names are slugged down to
/// lowercase alphanumerics and hyphens.
pub fn sanitize_team_segment(team: &str) -> String {
    let has_non_latin = team
        .chars()
        .any(|c| c.is_alphabetic() && !c.is_ascii_alphabetic());

    if has_non_latin {
        return format!("team_{}", URL_SAFE_NO_PAD.encode(team.as_bytes()));
    }

    let slug = team
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() { "team".to_string() } else { slug }
}

/// Deterministic object path for one attendee's QR image.
pub fn object_path(team: &str, employee_number: &str) -> String {
    format!("{}/{}.png", sanitize_team_segment(team), employee_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_team_name_is_encoded_with_marker() {
        let segment = sanitize_team_segment("개발팀");
        assert!(segment.starts_with("team_"));

        let decoded = URL_SAFE_NO_PAD.decode(&segment["team_".len()..]).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "개발팀");
    }

    #[test]
    fn latin_team_name_is_slugged() {
        assert_eq!(sanitize_team_segment("Blue Team!"), "blue-team");
        assert_eq!(sanitize_team_segment("  Sales -- EMEA  "), "sales-emea");
    }

    #[test]
    fn degenerate_names_fall_back_to_placeholder() {
        assert_eq!(sanitize_team_segment("---"), "team");
        assert_eq!(sanitize_team_segment(""), "team");
        assert_eq!(sanitize_team_segment("!!!"), "team");
    }

    #[test]
    fn object_path_combines_segment_and_employee_number() {
        assert_eq!(object_path("Blue Team", "10001"), "blue-team/10001.png");
    }

    #[test]
    fn same_team_always_maps_to_same_segment() {
        assert_eq!(sanitize_team_segment("영업팀"), sanitize_team_segment("영업팀"));
    }
}
