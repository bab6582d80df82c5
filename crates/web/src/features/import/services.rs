use futures_util::future::join_all;
use storage::{
    Database,
    dto::import::{RowFailure, UploadResult},
    error::StorageError,
    models::{Attendee, NewAttendee},
    repository::attendee::AttendeeRepository,
};
use thiserror::Error;

use crate::clients::blob::{BlobError, ObjectStore, object_path};
use crate::clients::mailer::{Mailer, QrEmail, send_qr_batch};
use crate::qr::{self, QrRenderError};
use crate::spreadsheet::RawRow;

/// Spreadsheet column headers the roster template uses.
pub const COL_NAME: &str = "직원명";
pub const COL_TEAM: &str = "팀명";
pub const COL_EMAIL: &str = "이메일";
pub const COL_EMPLOYEE_NUMBER: &str = "사번";
pub const COL_CLOTHING_SIZE: &str = "옷사이즈";
pub const COL_SPORTS_TEAM: &str = "체육대회팀명";

/// The header row occupies display row 1, so data row `i` (0-based) shows as
/// row `i + 2` in the spreadsheet application.
const HEADER_ROW_OFFSET: usize = 2;

/// Canonical person record produced by row normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEmployee {
    pub name: String,
    pub team: String,
    pub email: String,
    pub employee_number: String,
    pub clothing_size: Option<String>,
    pub sports_team: Option<String>,
}

/// Validate and clean one raw spreadsheet row. Returns `None` when any of
/// the four required fields is empty after trimming; rejection is an
/// expected per-row outcome, not an error.
pub fn normalize_row(row: &RawRow) -> Option<NormalizedEmployee> {
    let field = |header: &str| -> String {
        row.get(header)
            .map(|cell| cell.as_trimmed_string())
            .unwrap_or_default()
    };

    let name = field(COL_NAME);
    let team = field(COL_TEAM);
    let email = field(COL_EMAIL);
    let employee_number = field(COL_EMPLOYEE_NUMBER);

    if name.is_empty() || team.is_empty() || email.is_empty() || employee_number.is_empty() {
        return None;
    }

    let optional = |header: &str| -> Option<String> {
        Some(field(header)).filter(|v| !v.is_empty())
    };

    Some(NormalizedEmployee {
        name,
        team,
        email,
        employee_number,
        clothing_size: optional(COL_CLOTHING_SIZE),
        sports_team: optional(COL_SPORTS_TEAM),
    })
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{0}")]
    Qr(#[from] QrRenderError),

    #[error("{0}")]
    Blob(#[from] BlobError),

    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Roster write boundary, so the orchestrator can run against in-memory
/// fakes in tests.
#[async_trait::async_trait]
pub trait RosterStore: Send + Sync {
    async fn upsert(&self, new: &NewAttendee) -> Result<Attendee, StorageError>;
}

#[async_trait::async_trait]
impl RosterStore for Database {
    async fn upsert(&self, new: &NewAttendee) -> Result<Attendee, StorageError> {
        AttendeeRepository::new(self.pool()).upsert(new).await
    }
}

/// Collaborators for the per-row pipeline.
pub struct ImportDeps<'a> {
    pub roster: &'a dyn RosterStore,
    pub blob: &'a dyn ObjectStore,
    pub app_url: &'a str,
}

/// A row that made it through the whole pipeline: committed to the roster,
/// with its email job ready for the dispatch phase.
pub struct ProvisionedRow {
    pub attendee: Attendee,
    pub email: QrEmail,
}

/// Token → QR render → blob publish → roster upsert for one person. Any
/// step failing leaves no partial person record behind: the upsert is the
/// last step.
pub async fn provision(
    deps: &ImportDeps<'_>,
    employee: &NormalizedEmployee,
) -> Result<ProvisionedRow, ProvisionError> {
    let token = qr::generate_token();
    let check_in_url = qr::check_in_url(deps.app_url, &token);
    let png = qr::render_png(&check_in_url)?;

    let path = object_path(&employee.team, &employee.employee_number);
    deps.blob.upload(&path, png.clone(), "image/png").await?;
    let public_url = deps.blob.public_url(&path);

    let attendee = deps
        .roster
        .upsert(&NewAttendee {
            employee_number: employee.employee_number.clone(),
            name: employee.name.clone(),
            team: employee.team.clone(),
            email: employee.email.clone(),
            qr_token: token,
            qr_code_url: public_url,
            qr_code_storage_path: path,
            clothing_size: employee.clothing_size.clone(),
            sports_team: employee.sports_team.clone(),
        })
        .await?;

    let email = QrEmail {
        to: employee.email.clone(),
        name: employee.name.clone(),
        team: employee.team.clone(),
        check_in_url,
        qr_png: png,
        attachment_filename: "qr_code.png".to_string(),
    };

    Ok(ProvisionedRow { attendee, email })
}

async fn process_row(
    deps: &ImportDeps<'_>,
    row: &RawRow,
    index: usize,
) -> Result<ProvisionedRow, RowFailure> {
    let display_row = index + HEADER_ROW_OFFSET;

    let Some(employee) = normalize_row(row) else {
        return Err(RowFailure {
            row: display_row,
            reason: "Missing required field (name, team, email, or employee number)".to_string(),
            identifier: None,
        });
    };

    provision(deps, &employee).await.map_err(|e| {
        tracing::warn!(row = display_row, "import row failed: {}", e);
        RowFailure {
            row: display_row,
            reason: e.to_string(),
            identifier: Some(format!("{} ({})", employee.name, employee.email)),
        }
    })
}

/// Drive a full import: rows in fixed-size chunks processed concurrently
/// within a chunk and sequentially across chunks, then email jobs for the
/// stored rows dispatched in sub-batches. Row and delivery failures
/// accumulate; neither aborts the loop, and a delivery failure never rolls
/// back the committed roster write for its row.
pub async fn run_import(
    deps: &ImportDeps<'_>,
    mailer: &dyn Mailer,
    rows: &[RawRow],
    import_batch_size: usize,
    email_batch_size: usize,
) -> UploadResult {
    let mut result = UploadResult {
        total: rows.len(),
        ..Default::default()
    };

    if rows.is_empty() {
        return result;
    }

    let import_batch_size = import_batch_size.max(1);
    let email_batch_size = email_batch_size.max(1);

    let mut email_jobs = Vec::new();

    for (chunk_index, chunk) in rows.chunks(import_batch_size).enumerate() {
        let outcomes = join_all(chunk.iter().enumerate().map(|(offset, row)| {
            process_row(deps, row, chunk_index * import_batch_size + offset)
        }))
        .await;

        for outcome in outcomes {
            match outcome {
                Ok(provisioned) => {
                    result.stored += 1;
                    email_jobs.push(provisioned.email);
                }
                Err(failure) => result.failures.push(failure),
            }
        }

        tracing::info!(
            chunk = chunk_index + 1,
            stored = result.stored,
            total = result.total,
            "import chunk finished"
        );
    }

    for batch in email_jobs.chunks(email_batch_size) {
        let report = send_qr_batch(mailer, batch).await;
        result.emailed += report.succeeded;

        if report.failed > 0 {
            tracing::warn!(
                failed = report.failed,
                total = report.total,
                "some QR emails in this batch were not delivered"
            );
        }
    }

    result
}
