use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::adapter::{AdapterOutput, SourceAdapter};
use crate::error::Result;
use crate::model::{DedupKey, Record};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One adapter's records tagged with a priority. Lower priority numbers win
/// collisions; equal priorities fall back to the order batches were given.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub label: String,
    pub priority: u32,
    pub records: Vec<Record>,
    /// Rows the adapter dropped before reconciliation. Carried for reporting.
    pub skipped: usize,
}

impl SourceBatch {
    pub fn new(label: impl Into<String>, priority: u32, records: Vec<Record>) -> Self {
        Self { label: label.into(), priority, records, skipped: 0 }
    }

    pub fn from_output(output: AdapterOutput, priority: u32) -> Self {
        Self {
            label: output.label,
            priority,
            records: output.records,
            skipped: output.skipped,
        }
    }
}

/// Run every adapter in order, assigning priorities 0, 1, 2, …
///
/// Stops at the first failing adapter so nothing downstream sees a partial
/// source set.
pub fn collect(adapters: &[&dyn SourceAdapter]) -> Result<Vec<SourceBatch>> {
    adapters
        .iter()
        .enumerate()
        .map(|(priority, adapter)| {
            let output = adapter.produce_records()?;
            Ok(SourceBatch::from_output(output, priority as u32))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub label: String,
    pub priority: u32,
    pub input: usize,
    pub skipped: usize,
    pub kept: usize,
    pub duplicates: usize,
}

/// A record that lost to an earlier one with the same dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub key: String,
    pub kept_source: String,
    pub dropped_source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub sources: Vec<SourceStats>,
    pub total_input: usize,
    pub duplicates: usize,
    pub output: usize,
    pub collisions: Vec<Collision>,
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub records: Vec<Record>,
    pub report: ReconcileReport,
}

// ---------------------------------------------------------------------------
// Reconcile
// ---------------------------------------------------------------------------

/// Merge batches into one deduplicated directory sorted by name.
///
/// First write wins: among records sharing a [`DedupKey`], the one from the
/// highest-priority batch (earliest within a batch) survives unchanged and
/// the rest are discarded. No fields are merged across records.
pub fn reconcile(mut sources: Vec<SourceBatch>) -> Reconciliation {
    // Stable: equal priorities keep caller order.
    sources.sort_by_key(|s| s.priority);

    let mut seen: HashMap<DedupKey, usize> = HashMap::new();
    let mut records: Vec<Record> = Vec::new();
    let mut report = ReconcileReport::default();

    for (source_idx, batch) in sources.into_iter().enumerate() {
        let mut stats = SourceStats {
            label: batch.label.clone(),
            priority: batch.priority,
            input: batch.records.len(),
            skipped: batch.skipped,
            ..Default::default()
        };

        for record in batch.records {
            let key = record.dedup_key();
            match seen.get(&key) {
                Some(&winner) => {
                    stats.duplicates += 1;
                    let kept_source = report
                        .sources
                        .get(winner)
                        .map(|s| s.label.clone())
                        .unwrap_or_else(|| batch.label.clone());
                    debug!(key = %key, kept = %kept_source, dropped = %batch.label, "duplicate discarded");
                    report.collisions.push(Collision {
                        key: key.to_string(),
                        kept_source,
                        dropped_source: batch.label.clone(),
                    });
                }
                None => {
                    seen.insert(key, source_idx);
                    stats.kept += 1;
                    records.push(record);
                }
            }
        }

        report.total_input += stats.input;
        report.duplicates += stats.duplicates;
        report.sources.push(stats);
    }

    sort_records(&mut records);

    report.output = records.len();
    Reconciliation { records, report }
}

/// Codepoint order on name; city then state break ties so the order never
/// depends on input order.
fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| {
        a.name()
            .cmp(b.name())
            .then_with(|| a.city().cmp(b.city()))
            .then_with(|| a.state().cmp(b.state()))
    });
}

/// Incremental append: `existing` wins every tie against `batch`.
pub fn append(existing: AdapterOutput, batch: AdapterOutput) -> Reconciliation {
    reconcile(vec![
        SourceBatch::from_output(existing, 0),
        SourceBatch::from_output(batch, 1),
    ])
}
