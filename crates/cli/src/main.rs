// schooldir CLI - build and query the school directory
//
// Every writing command loads all of its sources before the sink runs, so a
// failing source never leaves a partially merged file behind.

mod directory;
mod exit_codes;
mod federal;
mod inspect;
mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use schooldir_config::{ConfigError, Settings};
use schooldir_recon::DirectoryError;
use tracing_subscriber::EnvFilter;

use exit_codes::{directory_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "schooldir")]
#[command(about = "Reconcile school lists into one deduplicated directory CSV")]
#[command(version)]
struct Cli {
    /// Settings file (default: ~/.config/schooldir/schooldir.toml if present)
    #[arg(long, global = true, env = "SCHOOLDIR_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log per-row decisions
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the directory from embedded tables and optional external sources
    #[command(after_help = "\
Sources are merged in this priority order (earlier wins on duplicates):
  existing output (--append), embedded tables, federal list, K-12 CSV

Examples:
  schooldir build
  schooldir build --table uc --table csu -o out/schools.csv
  schooldir build --federal
  schooldir build --federal-file SchoolCodeList.xlsx --k12 k12.csv
  schooldir build --append --k12 new_schools.csv")]
    Build(directory::BuildArgs),

    /// Append a K-12 CSV to an existing directory (existing rows win)
    #[command(after_help = "\
Examples:
  schooldir append k12_schools.csv
  schooldir append k12_schools.csv -o data/schools.csv")]
    Append {
        /// K-12 list with Name/School Name, City, State, CEEB columns
        k12: PathBuf,

        /// Directory file to extend (default: settings output)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Merge directory CSVs; earlier files win on duplicates
    #[command(after_help = "\
Examples:
  schooldir merge primary.csv secondary.csv -o merged.csv")]
    Merge {
        /// Directory CSVs in priority order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Download the Federal School Code List workbook to disk
    #[command(after_help = "\
Examples:
  schooldir fetch-federal
  schooldir fetch-federal --out cache/SchoolCodeList.xlsx
  schooldir build --federal-file cache/SchoolCodeList.xlsx")]
    FetchFederal {
        /// Destination file
        #[arg(long, default_value = "SchoolCodeList.xlsx")]
        out: PathBuf,
    },

    /// List embedded institution tables
    Tables {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Count records by type and list states covered
    Stats {
        /// Directory CSV (default: settings output)
        file: Option<PathBuf>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Find schools by name, city, state, CEEB code, or federal school code
    #[command(after_help = "\
Examples:
  schooldir search lincoln
  schooldir search 'high school' --state CA --type 'High School' --limit 5
  schooldir search 004704 --csv data/schools.csv")]
    Search(inspect::SearchArgs),

    /// Check a directory CSV for duplicates, nameless rows, and ordering
    #[command(after_help = "\
Exit code 6 when problems are found. Lines are file lines, header included.
Shared CEEB codes are warnings only.")]
    Validate {
        /// Directory CSV (default: settings output)
        file: Option<PathBuf>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = Settings::load(cli.config.as_deref())
        .map_err(CliError::config)
        .and_then(|settings| run(cli.command, &settings));

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(command: Commands, settings: &Settings) -> Result<(), CliError> {
    match command {
        Commands::Build(args) => directory::cmd_build(args, settings),
        Commands::Append { k12, output } => directory::cmd_append(k12, output, settings),
        Commands::Merge { inputs, output } => directory::cmd_merge(inputs, output, settings),
        Commands::FetchFederal { out } => federal::cmd_fetch_federal(out, settings),
        Commands::Tables { json } => inspect::cmd_tables(json),
        Commands::Stats { file, json } => inspect::cmd_stats(file, json, settings),
        Commands::Search(args) => inspect::cmd_search(args, settings),
        Commands::Validate { file, json } => inspect::cmd_validate(file, json, settings),
    }
}

/// Logs go to stderr; command results go to stdout.
fn init_logging(quiet: bool, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        Self {
            code: EXIT_USAGE,
            message: err.to_string(),
            hint: Some(format!("default settings path: {}", Settings::config_path_display())),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<DirectoryError> for CliError {
    fn from(err: DirectoryError) -> Self {
        let code = directory_exit_code(&err);
        let hint = match &err {
            DirectoryError::Schema { .. } => {
                Some("nothing was written; fix the source and re-run".to_string())
            }
            DirectoryError::SourceUnavailable { .. } => {
                Some("nothing was written; check the path or network and re-run".to_string())
            }
            DirectoryError::Io(_) => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}
