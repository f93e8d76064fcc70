// CSV source import

use std::path::Path;

use schooldir_recon::{DirectoryError, Table};
use tracing::debug;

/// Load a CSV file with a header row into a [`Table`].
///
/// Any failure (missing file, malformed CSV) makes the whole source
/// unavailable; `label` names the source in the error.
pub fn load_table(path: &Path, label: &str) -> Result<Table, DirectoryError> {
    let unavailable = |e: &dyn std::fmt::Display| {
        DirectoryError::unavailable(label, format!("{}: {}", path.display(), e))
    };
    let text = read_text(path).map_err(|e| unavailable(&e))?;
    let table = Table::from_csv(&text).map_err(|e| unavailable(&e))?;
    debug!(source = label, path = %path.display(), rows = table.len(), "csv loaded");
    Ok(table)
}

/// File contents as text. Lists saved from Excel on Windows are often
/// Windows-1252 rather than UTF-8.
fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => encoding_rs::WINDOWS_1252.decode(e.as_bytes()).0.into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_k12_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("k12.csv");
        fs::write(&path, "Name,City,State\nLincoln High School,Los Angeles,CA\n").unwrap();

        let table = load_table(&path, "k12").unwrap();
        assert_eq!(table.len(), 1);
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("Name"), Some("Lincoln High School"));
        assert_eq!(row.get("State"), Some("CA"));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempdir().unwrap();
        let err = load_table(&dir.path().join("nope.csv"), "k12").unwrap_err();
        match err {
            DirectoryError::SourceUnavailable { source_label, .. } => assert_eq!(source_label, "k12"),
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "Cañada College" with ñ as 0xF1
        let mut bytes = b"Name,City\nCa".to_vec();
        bytes.push(0xF1);
        bytes.extend_from_slice(b"ada College,Redwood City\n");
        fs::write(&path, bytes).unwrap();

        let table = load_table(&path, "latin").unwrap();
        assert_eq!(table.rows().next().unwrap().get("Name"), Some("Cañada College"));
    }

    #[test]
    fn test_excel_semicolon_export_with_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("k12.csv");
        fs::write(&path, "\u{feff}Name;City;State\nTroy High School;Fullerton;CA\n").unwrap();

        let table = load_table(&path, "k12").unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("Name"), Some("Troy High School"));
        assert_eq!(row.get("State"), Some("CA"));
    }
}
