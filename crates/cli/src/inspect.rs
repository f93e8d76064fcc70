//! Read-only commands: `tables`, `stats`, `search`, `validate`.

use std::path::{Path, PathBuf};

use clap::Args;
use schooldir_config::Settings;
use schooldir_recon::sink::HEADER;
use schooldir_recon::{
    audit_source, catalog, search, AuditReport, DirectorySummary, ExternalCsvAdapter, Record,
    SchoolType, SearchQuery, SourceAdapter,
};
use serde::Serialize;

use crate::exit_codes::EXIT_AUDIT_PROBLEMS;
use crate::pipeline;
use crate::CliError;

// ============================================================================
// tables
// ============================================================================

#[derive(Serialize)]
struct TableInfo {
    id: String,
    title: String,
    #[serde(rename = "type")]
    school_type: String,
    category: String,
    count: usize,
}

pub fn cmd_tables(json: bool) -> Result<(), CliError> {
    let tables = catalog::all_tables()
        .map_err(|e| schooldir_recon::DirectoryError::schema("embedded tables", e))?;

    let infos: Vec<TableInfo> = tables
        .into_iter()
        .map(|t| TableInfo {
            count: t.schools.len(),
            id: t.id,
            title: t.title,
            school_type: t.school_type,
            category: t.category,
        })
        .collect();

    if json {
        return print_json(&infos);
    }

    for t in &infos {
        println!("{:<20} {:<18} {:>4}  {}", t.id, t.school_type, t.count, t.title);
    }
    Ok(())
}

// ============================================================================
// stats
// ============================================================================

pub fn cmd_stats(file: Option<PathBuf>, json: bool, settings: &Settings) -> Result<(), CliError> {
    let path = file.unwrap_or_else(|| settings.output.clone());
    let records = read_records(&path, settings)?;
    let summary = DirectorySummary::of(&records);

    if json {
        return print_json(&summary);
    }

    println!("{}: {} schools", path.display(), summary.total);
    for c in &summary.by_type {
        println!("  {:<18} {:>6}", c.school_type.as_str(), c.count);
    }
    println!("States covered: {}", summary.states.len());
    if !summary.states.is_empty() {
        println!("  {}", summary.states.join(", "));
    }
    Ok(())
}

// ============================================================================
// search
// ============================================================================

#[derive(Args)]
pub struct SearchArgs {
    /// Text to find in name, city, state, CEEB or federal code (at least 2 characters)
    pub query: String,

    /// Only this type (High School, Community College, Trade School, University)
    #[arg(long = "type", value_name = "TYPE")]
    pub school_type: Option<String>,

    /// Only this state
    #[arg(long)]
    pub state: Option<String>,

    /// Maximum results
    #[arg(long, default_value_t = schooldir_recon::search::DEFAULT_LIMIT)]
    pub limit: usize,

    /// Directory CSV to search (default: settings output)
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

pub fn cmd_search(args: SearchArgs, settings: &Settings) -> Result<(), CliError> {
    let mut query = SearchQuery::new(&args.query)
        .map_err(|e| CliError::args(e.to_string()))?
        .with_limit(args.limit);
    if let Some(t) = &args.school_type {
        let t: SchoolType = t.parse().map_err(|e: schooldir_recon::SchemaError| CliError::args(e.to_string()))?;
        query = query.with_type(t);
    }
    if let Some(state) = args.state {
        query = query.with_state(state);
    }

    let path = args.csv.unwrap_or_else(|| settings.output.clone());
    let records = read_records(&path, settings)?;
    let hits = search(&records, &query);

    if args.json {
        let out: Vec<serde_json::Value> = hits
            .iter()
            .map(|h| serde_json::json!({ "display_name": h.display_name, "record": h.record }))
            .collect();
        return print_json(&out);
    }

    if hits.is_empty() {
        eprintln!("no matches for '{}'", query.text());
    }
    for hit in &hits {
        let r = hit.record;
        let codes = match (r.ceeb_code(), r.federal_code()) {
            ("", "") => String::new(),
            (ceeb, "") => format!("  CEEB {}", ceeb),
            ("", fed) => format!("  FSC {}", fed),
            (ceeb, fed) => format!("  CEEB {}  FSC {}", ceeb, fed),
        };
        println!("{}  [{}]{}", hit.display_name, r.school_type(), codes);
    }
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

#[derive(Serialize)]
struct ValidateOutput<'a> {
    file: String,
    missing_columns: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audit: Option<&'a AuditReport>,
}

pub fn cmd_validate(file: Option<PathBuf>, json: bool, settings: &Settings) -> Result<(), CliError> {
    let path = file.unwrap_or_else(|| settings.output.clone());
    let label = path.display().to_string();
    let table = schooldir_io::csv::load_table(&path, &label)?;

    let missing_columns: Vec<&'static str> =
        HEADER.iter().copied().filter(|h| !table.has_column(h)).collect();

    let report = if missing_columns.is_empty() {
        let output = ExternalCsvAdapter::directory(&label, table)
            .with_default_country(&settings.default_country)
            .produce_records()?;
        Some(audit_source(&output))
    } else {
        None
    };

    let problems = missing_columns.len() + report.as_ref().map_or(0, AuditReport::problem_count);

    if json {
        print_json(&ValidateOutput { file: label, missing_columns, audit: report.as_ref() })?;
    } else {
        print_validation(&label, &missing_columns, report.as_ref());
    }

    if problems > 0 {
        return Err(CliError {
            code: EXIT_AUDIT_PROBLEMS,
            message: format!("{}: {} problem(s) found", path.display(), problems),
            hint: None,
        });
    }
    Ok(())
}

/// Data row `i` is line `i + 2` of the file.
fn line(row: usize) -> usize {
    row + 2
}

fn print_validation(label: &str, missing: &[&str], report: Option<&AuditReport>) {
    for column in missing {
        println!("problem: missing column '{}'", column);
    }
    let Some(report) = report else {
        return;
    };

    for &row in &report.nameless_rows {
        println!("problem: line {} has no school name", line(row));
    }
    for dup in &report.duplicate_keys {
        let lines: Vec<String> = dup.rows.iter().map(|&r| line(r).to_string()).collect();
        println!("problem: duplicate key '{}' on lines {}", dup.key, lines.join(", "));
    }
    if let Some(row) = report.first_unsorted_row {
        println!("problem: line {} is out of name order", line(row));
    }
    for c in &report.ceeb_collisions {
        println!("warning: CEEB {} shared by {}", c.ceeb_code, c.names.join("; "));
    }
    if report.is_clean() {
        println!("{}: {} records, ok", label, report.records);
    }
}

// ============================================================================
// helpers
// ============================================================================

fn read_records(path: &Path, settings: &Settings) -> Result<Vec<Record>, CliError> {
    Ok(pipeline::directory_adapter(path, settings)?.produce_records()?.records)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}
