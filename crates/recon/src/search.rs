use thiserror::Error;

use crate::model::{Record, SchoolType};

pub const MIN_QUERY_LEN: usize = 2;
pub const DEFAULT_LIMIT: usize = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("query must be at least {MIN_QUERY_LEN} characters")]
    QueryTooShort,
}

/// Substring lookup over a directory, with optional exact filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    pub school_type: Option<SchoolType>,
    /// Compared case-insensitively after trimming.
    pub state: Option<String>,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(text: &str) -> Result<Self, SearchError> {
        let text = text.trim().to_lowercase();
        if text.chars().count() < MIN_QUERY_LEN {
            return Err(SearchError::QueryTooShort);
        }
        Ok(Self { text, school_type: None, state: None, limit: DEFAULT_LIMIT })
    }

    pub fn with_type(mut self, school_type: SchoolType) -> Self {
        self.school_type = Some(school_type);
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn matches(&self, r: &Record) -> bool {
        if let Some(t) = self.school_type {
            if r.school_type() != t {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if !r.state().trim().eq_ignore_ascii_case(state.trim()) {
                return false;
            }
        }
        search_text(r).contains(&self.text)
    }
}

/// Lowercased non-empty identifying fields, space separated.
fn search_text(r: &Record) -> String {
    [r.name(), r.city(), r.state(), r.ceeb_code(), r.federal_code()]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub record: &'a Record,
    pub display_name: String,
}

impl<'a> SearchHit<'a> {
    fn new(record: &'a Record) -> Self {
        Self {
            display_name: format!("{} - {}, {}", record.name(), record.city(), record.state()),
            record,
        }
    }
}

/// Matching records ordered by name, at most `query.limit` of them.
pub fn search<'a>(records: &'a [Record], query: &SearchQuery) -> Vec<SearchHit<'a>> {
    let mut hits: Vec<&Record> = records.iter().filter(|r| query.matches(r)).collect();
    hits.sort_by(|a, b| a.name().cmp(b.name()));
    hits.into_iter().take(query.limit).map(SearchHit::new).collect()
}
