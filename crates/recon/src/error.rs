use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// A record failed canonical validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Name was empty or whitespace after alias resolution.
    #[error("school name is empty")]
    EmptyName,

    /// Type tag is not one of the four directory categories.
    #[error("unknown school type '{0}' (expected High School, Community College, Trade School or University)")]
    UnknownType(String),

    /// An embedded or external table could not be interpreted at all.
    #[error("malformed table '{table}': {reason}")]
    MalformedTable { table: String, reason: String },
}

impl SchemaError {
    /// Row-level failures are dropped and counted; everything else aborts the adapter.
    pub fn is_row_level(&self) -> bool {
        matches!(self, Self::EmptyName)
    }
}

/// Errors surfaced by a pipeline invocation.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Record failed canonical validation.
    #[error("schema error in source '{source_label}': {error}")]
    Schema {
        source_label: String,
        #[source]
        error: SchemaError,
    },

    /// A whole source could not be read.
    #[error("source '{source_label}' unavailable: {reason}")]
    SourceUnavailable { source_label: String, reason: String },

    /// Output could not be written.
    #[error("I/O error: {0}")]
    Io(String),
}

impl DirectoryError {
    pub fn schema(source_label: impl Into<String>, error: SchemaError) -> Self {
        Self::Schema { source_label: source_label.into(), error }
    }

    pub fn unavailable(source_label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable { source_label: source_label.into(), reason: reason.into() }
    }
}

impl From<std::io::Error> for DirectoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
