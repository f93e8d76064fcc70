//! Directory serialization.
//!
//! # Persisted format
//!
//! Comma-separated, UTF-8, one header row, exactly twelve fields per row in
//! this order:
//!
//! | #  | Column                | Notes                                   |
//! |----|-----------------------|-----------------------------------------|
//! | 1  | `School Name`         | Never empty                             |
//! | 2  | `Type`                | High School, Community College, Trade School, University |
//! | 3  | `City`                |                                         |
//! | 4  | `State`               |                                         |
//! | 5  | `Country`             |                                         |
//! | 6  | `Address`             |                                         |
//! | 7  | `ZIP`                 |                                         |
//! | 8  | `Phone`               |                                         |
//! | 9  | `CEEB Code`           |                                         |
//! | 10 | `Federal School Code` |                                         |
//! | 11 | `Website`             |                                         |
//! | 12 | `Notes`               |                                         |
//!
//! Empty optional fields are written as empty strings, never omitted. The
//! header is written even when there are no records. The `csv` crate handles
//! quoting.

use std::io::Write;

use crate::error::{DirectoryError, Result};
use crate::model::Record;

pub const HEADER: [&str; 12] = [
    "School Name",
    "Type",
    "City",
    "State",
    "Country",
    "Address",
    "ZIP",
    "Phone",
    "CEEB Code",
    "Federal School Code",
    "Website",
    "Notes",
];

/// Write the header and every record, then flush.
pub fn write_records<W: Write>(out: W, records: &[Record]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);

    writer.write_record(HEADER).map_err(io_err)?;
    for record in records {
        writer.serialize(record).map_err(io_err)?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize to an in-memory string.
pub fn to_csv_string(records: &[Record]) -> Result<String> {
    let mut buf = Vec::new();
    write_records(&mut buf, records)?;
    String::from_utf8(buf).map_err(|e| DirectoryError::Io(e.to_string()))
}

fn io_err(e: csv::Error) -> DirectoryError {
    DirectoryError::Io(e.to_string())
}
