use serde::Deserialize;

use crate::error::Result;
use crate::model::Record;

/// Anything that turns one input source into canonical records.
pub trait SourceAdapter {
    /// Human-readable source name used in logs and errors.
    fn label(&self) -> &str;

    /// Produce every valid record. Bad rows are dropped and counted in
    /// [`AdapterOutput::skipped`]; a schema violation that is not row-level
    /// fails the whole call.
    fn produce_records(&self) -> Result<AdapterOutput>;
}

/// Records from one adapter call plus the rows that were dropped.
///
/// Row numbers are 0-based positions among the source's data rows (or
/// entries), so a consumer can point back into the original file.
#[derive(Debug, Clone, Default)]
pub struct AdapterOutput {
    pub label: String,
    pub records: Vec<Record>,
    /// Source row of each entry in `records`, same length.
    pub rows: Vec<usize>,
    /// Source rows dropped for having no school name.
    pub dropped_rows: Vec<usize>,
    pub skipped: usize,
}

impl AdapterOutput {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Default::default() }
    }

    pub fn push(&mut self, row: usize, record: Record) {
        self.rows.push(row);
        self.records.push(record);
    }

    pub fn drop_row(&mut self, row: usize) {
        self.dropped_rows.push(row);
        self.skipped += 1;
    }
}

// ---------------------------------------------------------------------------
// Column aliases
// ---------------------------------------------------------------------------

/// Prioritized source column names for each canonical field.
/// The first alias with a non-blank cell wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAliases {
    pub name: Vec<String>,
    pub school_type: Vec<String>,
    pub city: Vec<String>,
    pub state: Vec<String>,
    pub country: Vec<String>,
    pub address: Vec<String>,
    pub zip: Vec<String>,
    pub phone: Vec<String>,
    pub ceeb: Vec<String>,
    pub code: Vec<String>,
    pub website: Vec<String>,
    pub notes: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl ColumnAliases {
    /// Headers of the persisted directory format, plus the short forms
    /// seen in hand-made K-12 lists.
    pub fn canonical() -> Self {
        Self {
            name: names(&["School Name", "Name"]),
            school_type: names(&["Type"]),
            city: names(&["City"]),
            state: names(&["State"]),
            country: names(&["Country"]),
            address: names(&["Address"]),
            zip: names(&["ZIP", "Zip"]),
            phone: names(&["Phone"]),
            ceeb: names(&["CEEB Code", "CEEB"]),
            code: names(&["Federal School Code"]),
            website: names(&["Website"]),
            notes: names(&["Notes"]),
        }
    }

    /// Column names used by the Federal School Code List workbook across
    /// its published revisions.
    pub fn federal() -> Self {
        Self {
            name: names(&["School Name", "SchoolName"]),
            school_type: Vec::new(),
            city: names(&["City"]),
            state: names(&["State", "StateCode"]),
            country: names(&["Country"]),
            address: names(&["Address"]),
            zip: names(&["Zip", "ZipCode", "ZIP"]),
            phone: Vec::new(),
            ceeb: Vec::new(),
            code: names(&["School Code", "SchoolCode"]),
            website: Vec::new(),
            notes: Vec::new(),
        }
    }
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Per-field replacements for a base alias set, as read from settings.
/// Fields left out keep the base list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AliasOverrides {
    pub name: Option<Vec<String>>,
    pub school_type: Option<Vec<String>>,
    pub city: Option<Vec<String>>,
    pub state: Option<Vec<String>>,
    pub country: Option<Vec<String>>,
    pub address: Option<Vec<String>>,
    pub zip: Option<Vec<String>>,
    pub phone: Option<Vec<String>>,
    pub ceeb: Option<Vec<String>>,
    pub code: Option<Vec<String>>,
    pub website: Option<Vec<String>>,
    pub notes: Option<Vec<String>>,
}

impl AliasOverrides {
    pub fn apply(&self, base: ColumnAliases) -> ColumnAliases {
        let pick = |over: &Option<Vec<String>>, base: Vec<String>| over.clone().unwrap_or(base);
        ColumnAliases {
            name: pick(&self.name, base.name),
            school_type: pick(&self.school_type, base.school_type),
            city: pick(&self.city, base.city),
            state: pick(&self.state, base.state),
            country: pick(&self.country, base.country),
            address: pick(&self.address, base.address),
            zip: pick(&self.zip, base.zip),
            phone: pick(&self.phone, base.phone),
            ceeb: pick(&self.ceeb, base.ceeb),
            code: pick(&self.code, base.code),
            website: pick(&self.website, base.website),
            notes: pick(&self.notes, base.notes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_aliases_cover_persisted_headers() {
        let a = ColumnAliases::canonical();
        for header in crate::sink::HEADER {
            let all = [
                &a.name, &a.school_type, &a.city, &a.state, &a.country, &a.address,
                &a.zip, &a.phone, &a.ceeb, &a.code, &a.website, &a.notes,
            ];
            assert!(
                all.iter().any(|list| list.iter().any(|h| h == header)),
                "header {header} has no alias"
            );
        }
    }

    #[test]
    fn partial_override_keeps_base_lists() {
        let over: AliasOverrides = toml::from_str(r#"name = ["Institution"]"#).unwrap();
        let a = over.apply(ColumnAliases::federal());
        assert_eq!(a.name, vec!["Institution".to_string()]);
        assert_eq!(a.code, ColumnAliases::federal().code);
        assert_eq!(a.state, ColumnAliases::federal().state);
    }

    #[test]
    fn unknown_override_field_is_rejected() {
        let err = toml::from_str::<AliasOverrides>(r#"nmae = ["x"]"#);
        assert!(err.is_err());
    }
}
