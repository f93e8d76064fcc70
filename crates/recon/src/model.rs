use std::fmt;

use serde::Serialize;

use crate::error::SchemaError;

/// Country written when a source does not say.
pub const DEFAULT_COUNTRY: &str = "USA";

// ---------------------------------------------------------------------------
// School type
// ---------------------------------------------------------------------------

/// The four directory categories. Anything else is a schema error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SchoolType {
    #[serde(rename = "High School")]
    HighSchool,
    #[serde(rename = "Community College")]
    CommunityCollege,
    #[serde(rename = "Trade School")]
    TradeSchool,
    #[serde(rename = "University")]
    University,
}

impl SchoolType {
    pub const ALL: [SchoolType; 4] = [
        SchoolType::HighSchool,
        SchoolType::CommunityCollege,
        SchoolType::TradeSchool,
        SchoolType::University,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighSchool => "High School",
            Self::CommunityCollege => "Community College",
            Self::TradeSchool => "Trade School",
            Self::University => "University",
        }
    }

    /// Parse a type tag. Surrounding whitespace and letter case are ignored;
    /// a blank tag is an unknown type, never a default.
    pub fn parse(value: &str) -> Result<Self, SchemaError> {
        let trimmed = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SchemaError::UnknownType(trimmed.to_string()))
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchoolType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One institution in canonical form.
///
/// Field order is the persisted column order. Fields are private: a record
/// is built once by an adapter through [`RecordBuilder`] and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "School Name")]
    name: String,
    #[serde(rename = "Type")]
    school_type: SchoolType,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "ZIP")]
    zip: String,
    #[serde(rename = "Phone")]
    phone: String,
    #[serde(rename = "CEEB Code")]
    ceeb_code: String,
    #[serde(rename = "Federal School Code")]
    federal_code: String,
    #[serde(rename = "Website")]
    website: String,
    #[serde(rename = "Notes")]
    notes: String,
}

impl Record {
    pub fn builder(name: impl Into<String>, school_type: SchoolType) -> RecordBuilder {
        RecordBuilder::new(name, school_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn school_type(&self) -> SchoolType {
        self.school_type
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn zip(&self) -> &str {
        &self.zip
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn ceeb_code(&self) -> &str {
        &self.ceeb_code
    }

    pub fn federal_code(&self) -> &str {
        &self.federal_code
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Identity used for deduplication. Display values stay untouched.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.name, &self.city, &self.state)
    }
}

/// Staged fields for a [`Record`]. Unset optional fields become `""`.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    name: String,
    school_type: SchoolType,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    address: Option<String>,
    zip: Option<String>,
    phone: Option<String>,
    ceeb_code: Option<String>,
    federal_code: Option<String>,
    website: Option<String>,
    notes: Option<String>,
}

macro_rules! builder_setters {
    ($($field:ident),* $(,)?) => {
        $(
            pub fn $field(mut self, value: impl Into<String>) -> Self {
                self.$field = Some(value.into());
                self
            }
        )*
    };
}

impl RecordBuilder {
    pub fn new(name: impl Into<String>, school_type: SchoolType) -> Self {
        Self {
            name: name.into(),
            school_type,
            city: None,
            state: None,
            country: None,
            address: None,
            zip: None,
            phone: None,
            ceeb_code: None,
            federal_code: None,
            website: None,
            notes: None,
        }
    }

    builder_setters!(city, state, country, address, zip, phone, ceeb_code, federal_code, website, notes);

    /// Validate and freeze. Fails when the name is blank.
    pub fn build(self) -> Result<Record, SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        Ok(Record {
            name: self.name,
            school_type: self.school_type,
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            zip: self.zip.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            ceeb_code: self.ceeb_code.unwrap_or_default(),
            federal_code: self.federal_code.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Dedup key
// ---------------------------------------------------------------------------

/// Normalized (name, city, state): trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    pub name: String,
    pub city: String,
    pub state: String,
}

impl DedupKey {
    pub fn new(name: &str, city: &str, state: &str) -> Self {
        Self {
            name: normalize(name),
            city: normalize(city),
            state: normalize(state),
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.name, self.city, self.state)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_type_ignores_case_and_whitespace() {
        assert_eq!(SchoolType::parse(" high school ").unwrap(), SchoolType::HighSchool);
        assert_eq!(SchoolType::parse("University").unwrap(), SchoolType::University);
        assert_eq!(SchoolType::parse("TRADE SCHOOL").unwrap(), SchoolType::TradeSchool);
    }

    #[test]
    fn parse_type_rejects_unknown_and_blank() {
        assert_eq!(
            SchoolType::parse("Middle School").unwrap_err(),
            SchemaError::UnknownType("Middle School".into())
        );
        assert!(matches!(SchoolType::parse("  "), Err(SchemaError::UnknownType(_))));
    }

    #[test]
    fn build_rejects_blank_name() {
        let err = Record::builder("   ", SchoolType::University).build().unwrap_err();
        assert_eq!(err, SchemaError::EmptyName);
    }

    #[test]
    fn absent_fields_are_empty_strings() {
        let r = Record::builder("Stanford University", SchoolType::University)
            .city("Stanford")
            .build()
            .unwrap();
        assert_eq!(r.city(), "Stanford");
        assert_eq!(r.state(), "");
        assert_eq!(r.ceeb_code(), "");
        assert_eq!(r.notes(), "");
    }

    #[test]
    fn display_values_are_preserved() {
        let r = Record::builder(" Lincoln High School ", SchoolType::HighSchool)
            .state("ca")
            .build()
            .unwrap();
        assert_eq!(r.name(), " Lincoln High School ");
        assert_eq!(r.state(), "ca");
    }

    #[test]
    fn dedup_key_normalizes_case_and_whitespace() {
        let a = DedupKey::new("Lincoln High School", "Los Angeles", "CA");
        let b = DedupKey::new("LINCOLN HIGH SCHOOL", " Los Angeles ", "ca");
        assert_eq!(a, b);
        assert_ne!(a, DedupKey::new("Lincoln High School", "Los Angeles", "NE"));
    }
}
