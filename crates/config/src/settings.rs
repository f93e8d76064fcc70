// Pipeline settings
// Loaded from --config, $SCHOOLDIR_CONFIG, or ~/.config/schooldir/schooldir.toml

use std::fs;
use std::path::{Path, PathBuf};

use schooldir_recon::external::K12_NOTES;
use schooldir_recon::spreadsheet::FEDERAL_NOTES;
use schooldir_recon::{AliasOverrides, ColumnAliases, DEFAULT_COUNTRY};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_OUTPUT: &str = "data/us_schools_ceeb_and_federal_codes_template.csv";
pub const DEFAULT_FEDERAL_URL: &str =
    "https://studentaid.gov/sites/default/files/fsawg/datacenter/library/SchoolCodeList.xlsx";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

/// Federal School Code List source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FederalSettings {
    pub url: String,

    /// Whole-request timeout for the download. Must be non-zero.
    pub timeout_secs: u64,

    pub notes: String,

    /// Replacements for the built-in column alias lists
    pub columns: AliasOverrides,
}

impl Default for FederalSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEDERAL_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            notes: FEDERAL_NOTES.to_string(),
            columns: AliasOverrides::default(),
        }
    }
}

impl FederalSettings {
    pub fn column_aliases(&self) -> ColumnAliases {
        self.columns.apply(ColumnAliases::federal())
    }
}

/// K-12 append source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct K12Settings {
    pub notes: String,
    pub columns: AliasOverrides,
}

impl Default for K12Settings {
    fn default() -> Self {
        Self { notes: K12_NOTES.to_string(), columns: AliasOverrides::default() }
    }
}

impl K12Settings {
    pub fn column_aliases(&self) -> ColumnAliases {
        self.columns.apply(ColumnAliases::canonical())
    }
}

/// Embedded literal tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LiteralSettings {
    /// Table ids to include. Empty = every embedded table, catalog order.
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory file written by build/append and read back by --append
    pub output: PathBuf,

    /// Country for sources that do not carry one
    pub default_country: String,

    pub federal: FederalSettings,
    pub k12: K12Settings,
    pub literal: LiteralSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            default_country: DEFAULT_COUNTRY.to_string(),
            federal: FederalSettings::default(),
            k12: K12Settings::default(),
            literal: LiteralSettings::default(),
        }
    }
}

impl Settings {
    /// Per-user settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("schooldir");
        config_dir.join("schooldir.toml")
    }

    /// Resolve settings.
    ///
    /// An explicit path must exist and parse. Otherwise the per-user file is
    /// used when present, and built-in defaults when it is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        let path = Self::config_path();
        if path.exists() {
            Self::load_file(&path)
        } else {
            debug!(path = %path.display(), "no settings file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&contents).map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn from_toml(input: &str) -> Result<Self, String> {
        let settings: Settings = toml::from_str(input).map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), String> {
        if self.federal.timeout_secs == 0 {
            return Err("federal.timeout_secs must be greater than 0".to_string());
        }
        if self.output.as_os_str().is_empty() {
            return Err("output must not be empty".to_string());
        }
        Ok(())
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
