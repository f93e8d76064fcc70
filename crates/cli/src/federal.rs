//! Federal School Code List download.
//!
//! One blocking GET with the configured timeout. No retries: a failed
//! download makes the source unavailable and the command aborts.

use std::path::PathBuf;
use std::time::Duration;

use schooldir_config::Settings;
use schooldir_recon::spreadsheet::FEDERAL_LABEL;
use schooldir_recon::{DirectoryError, Table};
use tracing::info;

use crate::CliError;

const USER_AGENT: &str = concat!("schooldir/", env!("CARGO_PKG_VERSION"));

pub struct FederalClient {
    http: reqwest::blocking::Client,
    url: String,
}

impl FederalClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DirectoryError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DirectoryError::unavailable(FEDERAL_LABEL, format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, url: url.into() })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, DirectoryError> {
        Self::new(&settings.federal.url, Duration::from_secs(settings.federal.timeout_secs))
    }

    /// Fetch the workbook bytes. Non-2xx and transport failures are
    /// [`DirectoryError::SourceUnavailable`].
    pub fn download(&self) -> Result<Vec<u8>, DirectoryError> {
        info!(url = %self.url, "downloading federal school code list");

        let resp = self
            .http
            .get(&self.url)
            .send()
            .map_err(|e| DirectoryError::unavailable(FEDERAL_LABEL, format!("request to {} failed: {}", self.url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DirectoryError::unavailable(
                FEDERAL_LABEL,
                format!("{} returned HTTP {}", self.url, status.as_u16()),
            ));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| DirectoryError::unavailable(FEDERAL_LABEL, format!("failed to read response body: {}", e)))?;
        info!(bytes = bytes.len(), "federal list downloaded");
        Ok(bytes.to_vec())
    }

    /// Download and decode the first sheet.
    pub fn fetch_table(&self) -> Result<Table, DirectoryError> {
        schooldir_io::xlsx::table_from_bytes(self.download()?, FEDERAL_LABEL)
    }
}

/// `schooldir fetch-federal`: download, check it decodes, save to disk.
pub fn cmd_fetch_federal(out: PathBuf, settings: &Settings) -> Result<(), CliError> {
    let client = FederalClient::from_settings(settings)?;
    let bytes = client.download()?;

    // Refuse to cache something the build step could not read.
    let table = schooldir_io::xlsx::table_from_bytes(bytes.clone(), FEDERAL_LABEL)?;
    schooldir_io::write_bytes(&out, &bytes)?;

    println!("Saved {} rows to {}", table.len(), out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use schooldir_recon::{SchoolType, SourceAdapter, SpreadsheetAdapter};

    fn workbook_bytes() -> Vec<u8> {
        let mut wb = rust_xlsxwriter::Workbook::new();
        let ws = wb.add_worksheet();
        for (col, h) in ["SchoolCode", "SchoolName", "City", "StateCode", "ZipCode"].iter().enumerate() {
            ws.write_string(0, col as u16, *h).unwrap();
        }
        for (col, v) in ["001312", "University of California-Berkeley", "Berkeley", "CA", "94720"].iter().enumerate() {
            ws.write_string(1, col as u16, *v).unwrap();
        }
        wb.save_to_buffer().unwrap()
    }

    #[test]
    fn test_download_and_decode() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/SchoolCodeList.xlsx")
                .header_exists("user-agent");
            then.status(200)
                .header("content-type", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
                .body(workbook_bytes());
        });

        let client = FederalClient::new(server.url("/SchoolCodeList.xlsx"), Duration::from_secs(5)).unwrap();
        let table = client.fetch_table().unwrap();
        mock.assert();

        let out = SpreadsheetAdapter::new(table).produce_records().unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].federal_code(), "001312");
        assert_eq!(out.records[0].school_type(), SchoolType::University);
    }

    #[test]
    fn test_http_error_is_unavailable_without_retry() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/SchoolCodeList.xlsx");
            then.status(503);
        });

        let client = FederalClient::new(server.url("/SchoolCodeList.xlsx"), Duration::from_secs(5)).unwrap();
        let err = client.download().unwrap_err();
        mock.assert_hits(1);

        match err {
            DirectoryError::SourceUnavailable { source_label, reason } => {
                assert_eq!(source_label, FEDERAL_LABEL);
                assert!(reason.contains("503"), "reason: {reason}");
            }
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_timeout_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow.xlsx");
            then.status(200).delay(Duration::from_secs(3)).body(workbook_bytes());
        });

        let client = FederalClient::new(server.url("/slow.xlsx"), Duration::from_millis(300)).unwrap();
        let err = client.download().unwrap_err();
        assert!(matches!(err, DirectoryError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_non_workbook_body_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/SchoolCodeList.xlsx");
            then.status(200).body("<html>maintenance</html>");
        });

        let client = FederalClient::new(server.url("/SchoolCodeList.xlsx"), Duration::from_secs(5)).unwrap();
        let err = client.fetch_table().unwrap_err();
        assert!(matches!(err, DirectoryError::SourceUnavailable { .. }));
    }
}
