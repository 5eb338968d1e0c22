//! Configuration loading and database path resolution
//!
//! Resolution order for the config file:
//! 1. Command-line argument (highest priority)
//! 2. `CORPUS_NORM_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/corpus-norm/config.toml`)
//! 4. Built-in defaults (fallback)
//!
//! A missing file falls through to defaults. A file that exists but does not
//! parse is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CORPUS_NORM_CONFIG";

/// Environment variable naming the database file
pub const DATABASE_ENV_VAR: &str = "CORPUS_NORM_DATABASE";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database holding the corpus tables
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Table names for every job
    #[serde(default)]
    pub tables: TableNames,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Names of the tables the jobs read and write.
///
/// Defaults are the names the corpora were imported under.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableNames {
    /// CSJ clauses carrying talk-level interviewer/interviewee demographics
    pub csj_results: String,
    /// CSJ clauses that receive speaker/interlocutor identifiers
    pub csj_dataset: String,
    /// CSJ talk to interviewer/interviewee identifier mapping
    pub csj_dialogues: String,
    /// CWPC rows as exported, one per verb with context windows
    pub cwpc_original: String,
    /// CWPC rows after utterance stitching, one per utterance
    pub cwpc_reformatted: String,
    /// CWPC rows with raw ages and occupations for categorisation
    pub cwpc_dataset: String,
    /// Occupation reference table
    pub occupations: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            csj_results: "CSJ Results".to_string(),
            csj_dataset: "CSJ Dataset".to_string(),
            csj_dialogues: "Dialogues".to_string(),
            cwpc_original: "CWPC Original".to_string(),
            cwpc_reformatted: "CWPC Reformatted".to_string(),
            cwpc_dataset: "CWPC Dataset".to_string(),
            occupations: "JSOC".to_string(),
        }
    }
}

/// Where the configuration was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Existing file (CLI, environment or platform default)
    File(PathBuf),
    /// File named by CLI or environment that does not exist
    Missing(PathBuf),
    /// Nothing named and no platform default file
    Defaults,
}

impl ConfigSource {
    /// Pick the config file: CLI argument, then `CORPUS_NORM_CONFIG`, then
    /// the platform config directory
    pub fn locate(cli_path: Option<&Path>) -> Self {
        let explicit = cli_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));

        if let Some(path) = explicit {
            return if path.exists() {
                ConfigSource::File(path)
            } else {
                ConfigSource::Missing(path)
            };
        }

        match default_config_path() {
            Some(path) if path.exists() => ConfigSource::File(path),
            _ => ConfigSource::Defaults,
        }
    }

    /// Report the source once logging is up
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            ),
            ConfigSource::Defaults => warn!("No config file found, using built-in defaults"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Load configuration from a file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a located source, without logging
    ///
    /// A missing file yields built-in defaults; a malformed one is an error.
    pub fn from_source(source: &ConfigSource) -> Result<Self> {
        match source {
            ConfigSource::File(path) => Self::load(path),
            ConfigSource::Missing(_) | ConfigSource::Defaults => Ok(Self::default()),
        }
    }

    /// Locate, load and log configuration
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        let source = ConfigSource::locate(cli_path);
        let config = Self::from_source(&source)?;
        source.log();
        Ok(config)
    }

    /// Resolve the database path
    ///
    /// Priority: CLI argument, `CORPUS_NORM_DATABASE`, TOML `database_path`,
    /// platform data directory.
    pub fn database_path(&self, cli_path: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_path {
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
            return PathBuf::from(path);
        }

        if let Some(path) = &self.database_path {
            return path.clone();
        }

        default_database_path()
    }
}

/// Platform config file location
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("corpus-norm").join("config.toml"))
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("corpus-norm"))
        .unwrap_or_else(|| PathBuf::from("./corpus_data"))
        .join("corpora.db")
}
