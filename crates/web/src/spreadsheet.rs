use calamine::{Data, Reader, Xlsx, XlsxError, open_workbook_from_rs};
use std::collections::HashMap;
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Unable to read workbook: {0}")]
    Workbook(#[from] XlsxError),

    #[error("The workbook contains no sheets")]
    NoSheet,
}

/// A spreadsheet cell, normalized at the boundary to the three shapes the
/// roster columns can arrive in.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Cell content as a trimmed string. Whole numbers lose their float
    /// representation, so an employee number cell of `12345.0` comes back as
    /// `"12345"`.
    pub fn as_trimmed_string(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Empty => String::new(),
        }
    }
}

/// One raw row keyed by column header.
pub type RawRow = HashMap<String, CellValue>;

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Empty | Data::Error(_) => CellValue::Empty,
    }
}

/// Read the first sheet of an xlsx workbook into ordered rows keyed by the
/// header row. A workbook without any sheet is a whole-request error.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<RawRow>, SheetError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoSheet)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell_value(cell).as_trimmed_string())
        .collect();

    let parsed = rows
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.clone(), cell_value(cell)))
                .collect()
        })
        .collect();

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn roster_workbook(rows: &[(&str, &str, &str, f64)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        sheet.write_string(0, 0, "직원명").unwrap();
        sheet.write_string(0, 1, "팀명").unwrap();
        sheet.write_string(0, 2, "이메일").unwrap();
        sheet.write_string(0, 3, "사번").unwrap();

        for (i, (name, team, email, number)) in rows.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, *name).unwrap();
            sheet.write_string(row, 1, *team).unwrap();
            sheet.write_string(row, 2, *email).unwrap();
            sheet.write_number(row, 3, *number).unwrap();
        }

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn reads_rows_keyed_by_header() {
        let bytes = roster_workbook(&[
            ("홍길동", "개발팀", "hong@example.com", 10001.0),
            ("김철수", "영업팀", "kim@example.com", 10002.0),
        ]);

        let rows = read_first_sheet(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("직원명"),
            Some(&CellValue::Text("홍길동".to_string()))
        );
        assert_eq!(rows[1].get("이메일").unwrap().as_trimmed_string(), "kim@example.com");
    }

    #[test]
    fn numeric_employee_number_becomes_integer_string() {
        let bytes = roster_workbook(&[("홍길동", "개발팀", "hong@example.com", 10001.0)]);

        let rows = read_first_sheet(&bytes).unwrap();
        assert_eq!(rows[0].get("사번").unwrap().as_trimmed_string(), "10001");
    }

    #[test]
    fn header_only_sheet_yields_no_rows() {
        let bytes = roster_workbook(&[]);
        let rows = read_first_sheet(&bytes).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = read_first_sheet(b"this is not a workbook");
        assert!(matches!(result, Err(SheetError::Workbook(_))));
    }
}
