use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{Record, SchoolType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub school_type: SchoolType,
    pub count: usize,
}

/// Totals for a directory. Every type is listed, with zero when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorySummary {
    pub total: usize,
    pub by_type: Vec<TypeCount>,
    /// Distinct non-empty states, trimmed, sorted.
    pub states: Vec<String>,
}

impl DirectorySummary {
    pub fn of(records: &[Record]) -> Self {
        let by_type = SchoolType::ALL
            .iter()
            .map(|&t| TypeCount {
                school_type: t,
                count: records.iter().filter(|r| r.school_type() == t).count(),
            })
            .collect();

        let states: BTreeSet<String> = records
            .iter()
            .map(|r| r.state().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self { total: records.len(), by_type, states: states.into_iter().collect() }
    }

    pub fn count(&self, school_type: SchoolType) -> usize {
        self.by_type
            .iter()
            .find(|c| c.school_type == school_type)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_type() {
        let records = vec![
            Record::builder("A", SchoolType::University).state("CA").build().unwrap(),
            Record::builder("B", SchoolType::University).state("OR").build().unwrap(),
            Record::builder("C", SchoolType::HighSchool).state(" CA ").build().unwrap(),
            Record::builder("D", SchoolType::HighSchool).build().unwrap(),
        ];
        let s = DirectorySummary::of(&records);
        assert_eq!(s.total, 4);
        assert_eq!(s.by_type.len(), 4);
        assert_eq!(s.count(SchoolType::University), 2);
        assert_eq!(s.count(SchoolType::HighSchool), 2);
        assert_eq!(s.count(SchoolType::TradeSchool), 0);
        assert_eq!(s.states, vec!["CA".to_string(), "OR".to_string()]);
    }

    #[test]
    fn empty_directory() {
        let s = DirectorySummary::of(&[]);
        assert_eq!(s.total, 0);
        assert!(s.by_type.iter().all(|c| c.count == 0));
        assert!(s.states.is_empty());
    }
}
