// Excel source import (xlsx, xls, xlsb, ods)

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
use schooldir_recon::{DirectoryError, Table};
use tracing::debug;

/// Load the first worksheet of a workbook on disk. Row 1 is the header.
pub fn load_table(path: &Path, label: &str) -> Result<Table, DirectoryError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| {
        DirectoryError::unavailable(label, format!("failed to open {}: {}", path.display(), e))
    })?;
    first_sheet(&mut workbook, label)
}

/// Same as [`load_table`] for a workbook already in memory (a fresh download).
pub fn table_from_bytes(bytes: Vec<u8>, label: &str) -> Result<Table, DirectoryError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| DirectoryError::unavailable(label, format!("failed to open workbook: {}", e)))?;
    first_sheet(&mut workbook, label)
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>, label: &str) -> Result<Table, DirectoryError> {
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first() else {
        return Err(DirectoryError::unavailable(label, "workbook contains no sheets"));
    };

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| DirectoryError::unavailable(label, format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(DirectoryError::unavailable(label, format!("sheet '{}' is empty", sheet_name)));
    };

    let headers: Vec<String> = header_row.iter().map(cell_text).collect();
    let body: Vec<Vec<String>> = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    debug!(source = label, sheet = %sheet_name, rows = body.len(), "sheet loaded");
    Ok(Table::new(headers, body))
}

/// Render a cell as the text a user would see in the sheet.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => format!("#{:?}", e),
        // Serial date; the source lists carry no dates worth formatting
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn federal_workbook() -> Workbook {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        let headers = ["SchoolCode", "SchoolName", "Address", "City", "StateCode", "ZipCode", "Province", "Country", "PostalCode"];
        for (col, h) in headers.iter().enumerate() {
            ws.write_string(0, col as u16, *h).unwrap();
        }
        ws.write_string(1, 0, "001312").unwrap();
        ws.write_string(1, 1, "University of California-Berkeley").unwrap();
        ws.write_string(1, 2, "200 California Hall").unwrap();
        ws.write_string(1, 3, "Berkeley").unwrap();
        ws.write_string(1, 4, "CA").unwrap();
        ws.write_number(1, 5, 94720.0).unwrap();
        ws.write_string(1, 7, "").unwrap();
        ws.write_string(2, 1, "Reed College").unwrap();
        ws.write_boolean(2, 8, true).unwrap();
        wb
    }

    #[test]
    fn test_first_sheet_from_bytes() {
        let bytes = federal_workbook().save_to_buffer().unwrap();
        let table = table_from_bytes(bytes, "federal").unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_column("SchoolName"));
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("SchoolCode"), Some("001312"));
        assert_eq!(rows[0].get("ZipCode"), Some("94720"));
        assert_eq!(rows[0].get("Province"), Some(""));
        assert_eq!(rows[1].get("PostalCode"), Some("TRUE"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SchoolCodeList.xlsx");
        federal_workbook().save(&path).unwrap();

        let table = load_table(&path, "federal").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_garbage_is_unavailable() {
        let err = table_from_bytes(b"not a workbook".to_vec(), "federal").unwrap_err();
        assert!(matches!(err, DirectoryError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(1312.0)), "1312");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Bool(false)), "FALSE");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
