use tracing::{debug, warn};

use crate::adapter::{AdapterOutput, ColumnAliases, SourceAdapter};
use crate::error::{DirectoryError, Result};
use crate::model::{Record, SchoolType, DEFAULT_COUNTRY};
use crate::table::Table;

pub const FEDERAL_LABEL: &str = "Federal School Code List";
pub const FEDERAL_NOTES: &str = "Federal Title IV Institution";

/// Adapter over a decoded Federal School Code List sheet.
///
/// Every row is a postsecondary institution, so the type is always
/// [`SchoolType::University`]. The source carries no CEEB codes.
#[derive(Debug, Clone)]
pub struct SpreadsheetAdapter {
    label: String,
    table: Table,
    columns: ColumnAliases,
    notes: String,
    default_country: String,
}

impl SpreadsheetAdapter {
    pub fn new(table: Table) -> Self {
        Self {
            label: FEDERAL_LABEL.to_string(),
            table,
            columns: ColumnAliases::federal(),
            notes: FEDERAL_NOTES.to_string(),
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }

    pub fn with_columns(mut self, columns: ColumnAliases) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }
}

impl SourceAdapter for SpreadsheetAdapter {
    fn label(&self) -> &str {
        &self.label
    }

    fn produce_records(&self) -> Result<AdapterOutput> {
        if !self.columns.name.iter().any(|c| self.table.has_column(c)) {
            return Err(DirectoryError::unavailable(
                &self.label,
                format!(
                    "no name column found (looked for {})",
                    self.columns.name.join(", ")
                ),
            ));
        }

        let c = &self.columns;
        let mut output = AdapterOutput::new(&self.label);

        for (i, row) in self.table.rows().enumerate() {
            let built = Record::builder(row.first_of(&c.name).unwrap_or(""), SchoolType::University)
                .city(row.first_of(&c.city).unwrap_or(""))
                .state(row.first_of(&c.state).unwrap_or(""))
                .country(row.first_of(&c.country).unwrap_or(&self.default_country))
                .address(row.first_of(&c.address).unwrap_or(""))
                .zip(row.first_of(&c.zip).unwrap_or(""))
                .federal_code(row.first_of(&c.code).unwrap_or(""))
                .notes(self.notes.as_str())
                .build();

            match built {
                Ok(record) => output.push(i, record),
                Err(e) if e.is_row_level() => {
                    // Header is row 1 in the sheet.
                    debug!(source = %self.label, row = i + 2, "dropping row: {e}");
                    output.drop_row(i);
                }
                Err(e) => return Err(DirectoryError::schema(&self.label, e)),
            }
        }

        if output.skipped > 0 {
            warn!(source = %self.label, skipped = output.skipped, "rows without a school name were dropped");
        }
        Ok(output)
    }
}
