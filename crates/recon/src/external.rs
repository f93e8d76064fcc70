use tracing::{debug, warn};

use crate::adapter::{AdapterOutput, ColumnAliases, SourceAdapter};
use crate::error::{DirectoryError, Result};
use crate::model::{Record, SchoolType, DEFAULT_COUNTRY};
use crate::table::Table;

pub const K12_NOTES: &str = "K-12 Institution";

/// How the external adapter decides each record's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePolicy {
    /// Every row gets this type and the default country. Used for K-12 lists.
    Force(SchoolType),
    /// Read the `Type` column. Used when a serialized directory is read back.
    FromColumn,
}

/// Adapter over a CSV in the canonical or near-canonical shape.
#[derive(Debug, Clone)]
pub struct ExternalCsvAdapter {
    label: String,
    table: Table,
    policy: TypePolicy,
    columns: ColumnAliases,
    notes: Option<String>,
    default_country: String,
}

impl ExternalCsvAdapter {
    pub fn new(label: impl Into<String>, table: Table, policy: TypePolicy) -> Self {
        Self {
            label: label.into(),
            table,
            policy,
            columns: ColumnAliases::canonical(),
            notes: None,
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }

    /// K-12 append source: type High School, country forced, fixed notes.
    pub fn k12(label: impl Into<String>, table: Table) -> Self {
        Self::new(label, table, TypePolicy::Force(SchoolType::HighSchool)).with_notes(K12_NOTES)
    }

    /// A previously serialized directory, read back verbatim.
    pub fn directory(label: impl Into<String>, table: Table) -> Self {
        Self::new(label, table, TypePolicy::FromColumn)
    }

    pub fn with_columns(mut self, columns: ColumnAliases) -> Self {
        self.columns = columns;
        self
    }

    /// Fixed notes for every row instead of the `Notes` column.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }
}

impl SourceAdapter for ExternalCsvAdapter {
    fn label(&self) -> &str {
        &self.label
    }

    fn produce_records(&self) -> Result<AdapterOutput> {
        let c = &self.columns;
        let mut output = AdapterOutput::new(&self.label);

        for (i, row) in self.table.rows().enumerate() {
            // Name before type: a nameless row is dropped even when its type
            // cell is blank too. Fully blank rows end up here as well.
            let name = row.first_of(&c.name).unwrap_or("");
            if name.trim().is_empty() {
                debug!(source = %self.label, row = i + 2, "dropping row without a school name");
                output.drop_row(i);
                continue;
            }

            let (school_type, country) = match self.policy {
                TypePolicy::Force(t) => (t, self.default_country.as_str()),
                TypePolicy::FromColumn => {
                    let t = SchoolType::parse(row.first_of(&c.school_type).unwrap_or(""))
                        .map_err(|e| {
                            warn!(source = %self.label, row = i + 2, "invalid type: {e}");
                            DirectoryError::schema(&self.label, e)
                        })?;
                    let country = row.first_of(&c.country).unwrap_or(&self.default_country);
                    (t, country)
                }
            };

            let notes = match &self.notes {
                Some(fixed) => fixed.as_str(),
                None => row.first_of(&c.notes).unwrap_or(""),
            };

            let record = Record::builder(name, school_type)
                .city(row.first_of(&c.city).unwrap_or(""))
                .state(row.first_of(&c.state).unwrap_or(""))
                .country(country)
                .address(row.first_of(&c.address).unwrap_or(""))
                .zip(row.first_of(&c.zip).unwrap_or(""))
                .phone(row.first_of(&c.phone).unwrap_or(""))
                .ceeb_code(row.first_of(&c.ceeb).unwrap_or(""))
                .federal_code(row.first_of(&c.code).unwrap_or(""))
                .website(row.first_of(&c.website).unwrap_or(""))
                .notes(notes)
                .build()
                .map_err(|e| DirectoryError::schema(&self.label, e))?;
            output.push(i, record);
        }

        if output.skipped > 0 {
            warn!(source = %self.label, skipped = output.skipped, "blank or nameless rows were dropped");
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    #[test]
    fn k12_forces_type_country_and_notes() {
        let t = Table::from_csv(
            "Name,City,State,Country,CEEB,Website,Type\n\
             Lincoln High School,Los Angeles,CA,Mexico,052460,https://lincoln.example,University\n",
        )
        .unwrap();
        let out = ExternalCsvAdapter::k12("k12.csv", t).produce_records().unwrap();
        let r = &out.records[0];
        assert_eq!(r.name(), "Lincoln High School");
        assert_eq!(r.school_type(), SchoolType::HighSchool);
        assert_eq!(r.country(), "USA");
        assert_eq!(r.ceeb_code(), "052460");
        assert_eq!(r.website(), "https://lincoln.example");
        assert_eq!(r.federal_code(), "");
        assert_eq!(r.notes(), "K-12 Institution");
    }

    #[test]
    fn school_name_wins_over_name() {
        let t = Table::from_csv("School Name,Name,City,State\nFirst,Second,Fresno,CA\n").unwrap();
        let out = ExternalCsvAdapter::k12("k12.csv", t).produce_records().unwrap();
        assert_eq!(out.records[0].name(), "First");
    }

    #[test]
    fn directory_reads_every_canonical_column() {
        let csv = "School Name,Type,City,State,Country,Address,ZIP,Phone,CEEB Code,Federal School Code,Website,Notes\n\
                   Pasadena City College,Community College,Pasadena,CA,,1570 E Colorado Blvd,91106,(626) 585-7123,004685,001261,https://pasadena.edu,California community college institution\n";
        let t = Table::from_csv(csv).unwrap();
        let out = ExternalCsvAdapter::directory("existing", t).produce_records().unwrap();
        let r = &out.records[0];
        assert_eq!(r.school_type(), SchoolType::CommunityCollege);
        assert_eq!(r.country(), "USA");
        assert_eq!(r.address(), "1570 E Colorado Blvd");
        assert_eq!(r.zip(), "91106");
        assert_eq!(r.phone(), "(626) 585-7123");
        assert_eq!(r.federal_code(), "001261");
        assert_eq!(r.notes(), "California community college institution");
    }

    #[test]
    fn directory_with_unknown_type_is_schema_error() {
        let t = Table::from_csv("School Name,Type,City,State\nSunny Days,Preschool,Irvine,CA\n").unwrap();
        let err = ExternalCsvAdapter::directory("existing", t).produce_records().unwrap_err();
        match err {
            DirectoryError::Schema { source_label, error } => {
                assert_eq!(source_label, "existing");
                assert_eq!(error, SchemaError::UnknownType("Preschool".into()));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn empty_name_rows_are_dropped_not_emitted() {
        let t = Table::from_csv("Name,City,State\n,Los Angeles,CA\nHoover High School,Glendale,CA\n,,\n").unwrap();
        let out = ExternalCsvAdapter::k12("k12.csv", t).produce_records().unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped, 2);
        assert_eq!(out.dropped_rows, vec![0, 2]);
        assert_eq!(out.rows, vec![1]);
        assert!(out.records.iter().all(|r| !r.name().trim().is_empty()));
    }

    #[test]
    fn nameless_row_with_blank_type_is_dropped_not_fatal() {
        let t = Table::from_csv(
            "School Name,Type,City,State\n\
             ,,Nowhere,CA\n\
             Reed College,University,Portland,OR\n",
        )
        .unwrap();
        let out = ExternalCsvAdapter::directory("existing", t).produce_records().unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].name(), "Reed College");
        assert_eq!(out.dropped_rows, vec![0]);
        assert_eq!(out.rows, vec![1]);
    }
}
