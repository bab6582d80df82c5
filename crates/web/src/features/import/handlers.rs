use axum::{
    Json,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use storage::dto::import::UploadResult;

use crate::error::WebError;
use crate::spreadsheet::{self, SheetError};
use crate::state::AppState;

use super::services::{self, ImportDeps};

const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

fn is_supported_upload(content_type: Option<&str>, filename: Option<&str>) -> bool {
    if let Some(content_type) = content_type {
        return ALLOWED_CONTENT_TYPES.contains(&content_type);
    }

    // Some clients omit the part's content type; fall back to the extension.
    filename
        .map(|name| {
            let name = name.to_ascii_lowercase();
            name.ends_with(".xlsx") || name.ends_with(".xls")
        })
        .unwrap_or(false)
}

#[utoipa::path(
    post,
    path = "/api/import",
    responses(
        (status = 200, description = "Import finished; per-row failures listed in the body", body = UploadResult),
        (status = 400, description = "Missing file, unsupported file type, or unreadable workbook")
    ),
    tag = "import"
)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| WebError::BadRequest(format!("Failed to read upload: {e}")))?;

            file = Some((filename, content_type, bytes));
            break;
        }
    }

    let Some((filename, content_type, bytes)) = file else {
        return Err(WebError::BadRequest(
            "No spreadsheet file attached".to_string(),
        ));
    };

    if !is_supported_upload(content_type.as_deref(), filename.as_deref()) {
        return Err(WebError::BadRequest("Unsupported file type".to_string()));
    }

    tracing::info!(
        filename = filename.as_deref().unwrap_or("unknown"),
        size = bytes.len(),
        "roster import started"
    );

    let rows = spreadsheet::read_first_sheet(&bytes).map_err(|e| match e {
        SheetError::NoSheet => WebError::BadRequest("The workbook contains no sheets".to_string()),
        SheetError::Workbook(e) => WebError::BadRequest(format!("Unable to read workbook: {e}")),
    })?;

    let deps = ImportDeps {
        roster: &state.db,
        blob: state.blob.as_ref(),
        app_url: &state.config.app_url,
    };

    let result = services::run_import(
        &deps,
        state.mailer.as_ref(),
        &rows,
        state.config.import_batch_size,
        state.config.email_batch_size,
    )
    .await;

    tracing::info!(
        total = result.total,
        stored = result.stored,
        emailed = result.emailed,
        failed = result.failures.len(),
        "roster import finished"
    );

    Ok(Json(result).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xlsx_content_type_is_supported() {
        assert!(is_supported_upload(
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            None
        ));
        assert!(is_supported_upload(Some("application/vnd.ms-excel"), None));
    }

    #[test]
    fn other_content_types_are_rejected() {
        assert!(!is_supported_upload(Some("text/csv"), Some("roster.xlsx")));
        assert!(!is_supported_upload(Some("application/pdf"), None));
    }

    #[test]
    fn extension_decides_when_content_type_is_absent() {
        assert!(is_supported_upload(None, Some("roster.xlsx")));
        assert!(is_supported_upload(None, Some("ROSTER.XLS")));
        assert!(!is_supported_upload(None, Some("roster.csv")));
        assert!(!is_supported_upload(None, None));
    }
}
