// Configuration loading

pub mod settings;

pub use settings::{ConfigError, FederalSettings, K12Settings, LiteralSettings, Settings};
