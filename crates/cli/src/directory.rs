//! Writing commands: `schooldir build`, `append`, `merge`.

use std::path::PathBuf;

use clap::Args;
use schooldir_config::Settings;
use schooldir_recon::spreadsheet::FEDERAL_LABEL;
use schooldir_recon::{append, reconcile, SourceAdapter};
use tracing::info;

use crate::federal::FederalClient;
use crate::pipeline;
use crate::CliError;

#[derive(Args)]
pub struct BuildArgs {
    /// Embedded table id to include (repeatable; default: settings, else every table)
    #[arg(long = "table", value_name = "ID")]
    pub tables: Vec<String>,

    /// Download and include the Federal School Code List
    #[arg(long, conflicts_with = "federal_file")]
    pub federal: bool,

    /// Include a previously downloaded federal workbook instead of downloading
    #[arg(long, value_name = "XLSX")]
    pub federal_file: Option<PathBuf>,

    /// Include a K-12 CSV; every row is typed High School
    #[arg(long, value_name = "CSV")]
    pub k12: Option<PathBuf>,

    /// Read the existing output first; its rows win on duplicates
    #[arg(long)]
    pub append: bool,

    /// Output file (default: settings output)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn cmd_build(args: BuildArgs, settings: &Settings) -> Result<(), CliError> {
    let out = args.output.unwrap_or_else(|| settings.output.clone());
    let mut adapters: Vec<Box<dyn SourceAdapter>> = Vec::new();

    if args.append {
        if out.exists() {
            adapters.push(Box::new(pipeline::directory_adapter(&out, settings)?));
        } else {
            info!(path = %out.display(), "no existing output, building from scratch");
        }
    }

    let ids = if args.tables.is_empty() { settings.literal.tables.clone() } else { args.tables };
    for adapter in pipeline::literal_adapters(&ids, settings)? {
        adapters.push(Box::new(adapter));
    }

    if let Some(path) = &args.federal_file {
        let table = schooldir_io::xlsx::load_table(path, FEDERAL_LABEL)?;
        adapters.push(Box::new(pipeline::federal_adapter(table, settings)));
    } else if args.federal {
        let table = FederalClient::from_settings(settings)?.fetch_table()?;
        adapters.push(Box::new(pipeline::federal_adapter(table, settings)));
    }

    if let Some(path) = &args.k12 {
        adapters.push(Box::new(pipeline::k12_adapter(path, settings)?));
    }

    let batches = pipeline::load_sources(&adapters)?;
    pipeline::finish(reconcile(batches), &out)
}

pub fn cmd_append(k12: PathBuf, output: Option<PathBuf>, settings: &Settings) -> Result<(), CliError> {
    let out = output.unwrap_or_else(|| settings.output.clone());

    let existing = pipeline::directory_adapter(&out, settings)
        .map_err(|e| e.with_hint("run `schooldir build` first, or pass -o"))?
        .produce_records()?;
    let batch = pipeline::k12_adapter(&k12, settings)?.produce_records()?;

    pipeline::finish(append(existing, batch), &out)
}

pub fn cmd_merge(inputs: Vec<PathBuf>, output: PathBuf, settings: &Settings) -> Result<(), CliError> {
    let mut adapters: Vec<Box<dyn SourceAdapter>> = Vec::new();
    for path in &inputs {
        adapters.push(Box::new(pipeline::directory_adapter(path, settings)?));
    }

    let batches = pipeline::load_sources(&adapters)?;
    pipeline::finish(reconcile(batches), &output)
}
