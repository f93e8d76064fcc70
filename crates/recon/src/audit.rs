//! Consistency checks over a serialized directory.
//!
//! Duplicate dedup keys, out-of-order rows and rows without a name are
//! problems: a reconciled file never has them. CEEB codes shared by different institutions are
//! reported as warnings only and never influence reconciliation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::adapter::AdapterOutput;
use crate::model::{DedupKey, Record};

/// Rows (0-based, data rows only) sharing one dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    pub key: String,
    pub rows: Vec<usize>,
}

/// A non-empty CEEB code carried by records with different dedup keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CeebCollision {
    pub ceeb_code: String,
    pub names: Vec<String>,
}

/// Row numbers are 0-based data rows: positions in the slice for
/// [`audit`], positions in the source file for [`audit_source`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub records: usize,
    pub duplicate_keys: Vec<DuplicateKey>,
    /// First data row that sorts before its predecessor.
    pub first_unsorted_row: Option<usize>,
    /// Rows the reader dropped because the school name was blank.
    pub nameless_rows: Vec<usize>,
    pub ceeb_collisions: Vec<CeebCollision>,
}

impl AuditReport {
    /// No problems. Warnings do not count.
    pub fn is_clean(&self) -> bool {
        self.problem_count() == 0
    }

    pub fn problem_count(&self) -> usize {
        self.duplicate_keys.len()
            + self.nameless_rows.len()
            + usize::from(self.first_unsorted_row.is_some())
    }
}

pub fn audit(records: &[Record]) -> AuditReport {
    let mut by_key: BTreeMap<DedupKey, Vec<usize>> = BTreeMap::new();
    for (i, r) in records.iter().enumerate() {
        by_key.entry(r.dedup_key()).or_default().push(i);
    }
    let duplicate_keys = by_key
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(key, rows)| DuplicateKey { key: key.to_string(), rows })
        .collect();

    let first_unsorted_row = records
        .windows(2)
        .position(|w| sort_key(&w[0]) > sort_key(&w[1]))
        .map(|i| i + 1);

    AuditReport {
        records: records.len(),
        duplicate_keys,
        first_unsorted_row,
        nameless_rows: Vec::new(),
        ceeb_collisions: ceeb_collisions(records),
    }
}

/// Audit a file as read back by an adapter. Rows point into the source,
/// so rows the adapter dropped do not shift the numbers after them.
pub fn audit_source(output: &AdapterOutput) -> AuditReport {
    let source_row = |i: usize| output.rows.get(i).copied().unwrap_or(i);

    let mut report = audit(&output.records);
    for dup in &mut report.duplicate_keys {
        for row in &mut dup.rows {
            *row = source_row(*row);
        }
    }
    report.first_unsorted_row = report.first_unsorted_row.map(source_row);
    report.nameless_rows = output.dropped_rows.clone();
    report
}

fn sort_key(r: &Record) -> (&str, &str, &str) {
    (r.name(), r.city(), r.state())
}

/// CEEB codes are compared trimmed. Records with the same dedup key are one
/// institution and do not collide with themselves.
pub fn ceeb_collisions(records: &[Record]) -> Vec<CeebCollision> {
    let mut by_code: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for r in records {
        let code = r.ceeb_code().trim();
        if !code.is_empty() {
            by_code.entry(code).or_default().push(r);
        }
    }

    by_code
        .into_iter()
        .filter_map(|(code, group)| {
            let mut keys: Vec<DedupKey> = group.iter().map(|r| r.dedup_key()).collect();
            keys.sort();
            keys.dedup();
            if keys.len() < 2 {
                return None;
            }
            let mut names: Vec<String> = group.iter().map(|r| r.name().to_string()).collect();
            names.dedup();
            Some(CeebCollision { ceeb_code: code.to_string(), names })
        })
        .collect()
}
