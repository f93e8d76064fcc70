//! Source construction and the shared reconcile-then-write tail.

use std::path::Path;

use schooldir_config::Settings;
use schooldir_recon::audit::ceeb_collisions;
use schooldir_recon::{
    catalog, DirectorySummary, ExternalCsvAdapter, LiteralListAdapter, ReconcileReport,
    Reconciliation, SourceAdapter, SpreadsheetAdapter, Table,
};
use tracing::{info, warn};

use crate::CliError;

/// A previously written directory file, read back with its `Type` column.
pub fn directory_adapter(path: &Path, settings: &Settings) -> Result<ExternalCsvAdapter, CliError> {
    let label = path.display().to_string();
    let table = schooldir_io::csv::load_table(path, &label)?;
    Ok(ExternalCsvAdapter::directory(label, table).with_default_country(&settings.default_country))
}

/// A K-12 list: every row becomes a High School.
pub fn k12_adapter(path: &Path, settings: &Settings) -> Result<ExternalCsvAdapter, CliError> {
    let label = path.display().to_string();
    let table = schooldir_io::csv::load_table(path, &label)?;
    Ok(ExternalCsvAdapter::k12(label, table)
        .with_columns(settings.k12.column_aliases())
        .with_notes(&settings.k12.notes)
        .with_default_country(&settings.default_country))
}

pub fn federal_adapter(table: Table, settings: &Settings) -> SpreadsheetAdapter {
    SpreadsheetAdapter::new(table)
        .with_columns(settings.federal.column_aliases())
        .with_notes(&settings.federal.notes)
        .with_default_country(&settings.default_country)
}

/// Embedded tables by id, in catalog order. Empty selects every table.
pub fn literal_adapters(ids: &[String], settings: &Settings) -> Result<Vec<LiteralListAdapter>, CliError> {
    let known: Vec<&str> = catalog::table_ids().collect();
    if let Some(unknown) = ids.iter().find(|id| !known.contains(&id.as_str())) {
        return Err(CliError::args(format!("unknown table '{}'", unknown))
            .with_hint(format!("available tables: {}", known.join(", "))));
    }

    let tables = catalog::select(ids)
        .map_err(|e| schooldir_recon::DirectoryError::schema("embedded tables", e))?;
    Ok(tables
        .into_iter()
        .map(|t| LiteralListAdapter::new(t).with_country(&settings.default_country))
        .collect())
}

/// Run every adapter in priority order. Any failure aborts before anything
/// is reconciled or written.
pub fn load_sources(
    adapters: &[Box<dyn SourceAdapter>],
) -> Result<Vec<schooldir_recon::SourceBatch>, CliError> {
    let refs: Vec<&dyn SourceAdapter> = adapters.iter().map(|a| a.as_ref()).collect();
    Ok(schooldir_recon::collect(&refs)?)
}

/// Log the outcome, warn about shared CEEB codes, write atomically.
pub fn finish(result: Reconciliation, out: &Path) -> Result<(), CliError> {
    log_report(&result.report);

    for collision in ceeb_collisions(&result.records) {
        warn!(
            ceeb = %collision.ceeb_code,
            schools = %collision.names.join("; "),
            "CEEB code shared by different institutions"
        );
    }

    schooldir_io::write_directory(out, &result.records)?;

    let summary = DirectorySummary::of(&result.records);
    for count in &summary.by_type {
        info!(school_type = %count.school_type, count = count.count, "by type");
    }

    println!("Wrote {} schools to {}", summary.total, out.display());
    Ok(())
}

fn log_report(report: &ReconcileReport) {
    for s in &report.sources {
        info!(
            source = %s.label,
            priority = s.priority,
            input = s.input,
            skipped = s.skipped,
            kept = s.kept,
            duplicates = s.duplicates,
            "source merged"
        );
    }
    info!(
        input = report.total_input,
        duplicates = report.duplicates,
        output = report.output,
        "reconciled"
    );
}
