use serde::Deserialize;
use tracing::{debug, warn};

use crate::adapter::{AdapterOutput, SourceAdapter};
use crate::error::{DirectoryError, Result, SchemaError};
use crate::model::{Record, SchoolType, DEFAULT_COUNTRY};

/// A curated, in-memory list of institutions sharing one type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiteralTable {
    pub id: String,
    pub title: String,
    /// Type tag for every entry. Validated when records are produced.
    #[serde(rename = "type")]
    pub school_type: String,
    /// Provenance written into notes as `"<category> institution"`.
    pub category: String,
    /// State applied to entries that do not name their own.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub schools: Vec<LiteralEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiteralEntry {
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub ceeb: String,
    #[serde(default)]
    pub website: String,
}

impl LiteralTable {
    pub fn from_toml(table: &str, input: &str) -> std::result::Result<Self, SchemaError> {
        toml::from_str(input).map_err(|e| SchemaError::MalformedTable {
            table: table.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn notes(&self) -> String {
        format!("{} institution", self.category)
    }
}

/// Adapter over a [`LiteralTable`]. No I/O.
#[derive(Debug, Clone)]
pub struct LiteralListAdapter {
    table: LiteralTable,
    country: String,
}

impl LiteralListAdapter {
    pub fn new(table: LiteralTable) -> Self {
        Self { table, country: DEFAULT_COUNTRY.to_string() }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }
}

impl SourceAdapter for LiteralListAdapter {
    fn label(&self) -> &str {
        &self.table.title
    }

    fn produce_records(&self) -> Result<AdapterOutput> {
        let school_type = SchoolType::parse(&self.table.school_type)
            .map_err(|e| DirectoryError::schema(self.label(), e))?;
        let notes = self.table.notes();

        let mut output = AdapterOutput::new(self.label());
        for (i, entry) in self.table.schools.iter().enumerate() {
            let state = entry.state.as_deref().unwrap_or(&self.table.state);
            let built = Record::builder(entry.name.as_str(), school_type)
                .city(entry.city.as_str())
                .state(state)
                .country(self.country.as_str())
                .address(entry.address.as_str())
                .zip(entry.zip.as_str())
                .phone(entry.phone.as_str())
                .ceeb_code(entry.ceeb.as_str())
                .website(entry.website.as_str())
                .notes(notes.as_str())
                .build();

            match built {
                Ok(record) => output.push(i, record),
                Err(e) if e.is_row_level() => {
                    warn!(table = %self.table.id, entry = i, "skipping literal entry: {e}");
                    output.drop_row(i);
                }
                Err(e) => return Err(DirectoryError::schema(self.label(), e)),
            }
        }

        debug!(
            table = %self.table.id,
            records = output.records.len(),
            skipped = output.skipped,
            "literal table produced"
        );
        Ok(output)
    }
}
