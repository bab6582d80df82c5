use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Aggregate outcome of one bulk import request. `stored` and `emailed` are
/// independent: a row can be written to the roster and still fail delivery.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UploadResult {
    pub total: usize,
    pub stored: usize,
    pub emailed: usize,
    pub failures: Vec<RowFailure>,
}

/// One rejected spreadsheet row. `row` is the 1-based display row in the
/// sheet (data index + 2, accounting for the header row).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RowFailure {
    pub row: usize,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}
