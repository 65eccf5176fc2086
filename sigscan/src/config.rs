use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{ScanError, ScanResult};
use crate::search::Pattern;

/// Pattern searched for when none is configured
pub const DEFAULT_PATTERN: &str = "String to find in file";

/// Configuration for a scan run.
///
/// # Configuration Locations
///
/// Values are layered from these files, later ones winning:
/// 1. Global `$HOME/.config/sigscan/config.yaml`
/// 2. Local `.sigscan.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// Command-line arguments are applied last through [`ScanConfig::merge_with_cli`].
/// The source and destination directories are only taken from the command
/// line and are ignored in configuration files.
///
/// # Configuration Format
///
/// ```yaml
/// # ASCII signature to look for
/// pattern: "Data Recovery Labs"
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
///
/// # Draw the running totals spinner
/// show_progress: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root directory to scan
    #[serde(skip)]
    pub source_path: PathBuf,

    /// Directory the lists and event log are written to
    #[serde(skip)]
    pub destination_path: PathBuf,

    /// ASCII pattern; [`DEFAULT_PATTERN`] when unset
    #[serde(default)]
    pub pattern: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to draw live progress on stderr
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

/// Values given on the command line. `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub pattern: Option<String>,
    pub log_level: Option<String>,
    pub show_progress: Option<bool>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_show_progress() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::new(),
            destination_path: PathBuf::new(),
            pattern: None,
            log_level: default_log_level(),
            show_progress: default_show_progress(),
        }
    }
}

impl ScanConfig {
    /// Creates a configuration for `source` and `destination` with defaults
    /// for everything else
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source.into(),
            destination_path: destination.into(),
            ..Default::default()
        }
    }

    /// Loads configuration from the default locations plus an optional
    /// explicit file, which must exist
    pub fn load_from(config_path: Option<&Path>) -> ScanResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            dirs::config_dir().map(|p| p.join("sigscan/config.yaml")),
            Some(PathBuf::from(".sigscan.yaml")),
        ];
        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Merges command-line values over file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        self.source_path = cli.source_path;
        self.destination_path = cli.destination_path;
        if cli.pattern.is_some() {
            self.pattern = cli.pattern;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        if let Some(show) = cli.show_progress {
            self.show_progress = show;
        }
        self
    }

    /// Resolves the configured pattern, falling back to [`DEFAULT_PATTERN`]
    pub fn pattern(&self) -> ScanResult<Pattern> {
        Pattern::from_ascii(self.pattern.as_deref().unwrap_or(DEFAULT_PATTERN))
    }

    /// Checks everything that must hold before any output is created:
    /// the source is an existing directory, the destination is an existing
    /// directory outside the source tree and the pattern is valid.
    pub fn validate(&self) -> ScanResult<()> {
        if self.source_path.as_os_str().is_empty() {
            return Err(ScanError::config_error("source path is required"));
        }
        if !self.source_path.exists() {
            return Err(ScanError::SourceNotFound(self.source_path.clone()));
        }
        if !self.source_path.is_dir() {
            return Err(ScanError::NotADirectory(self.source_path.clone()));
        }

        if self.destination_path.as_os_str().is_empty() {
            return Err(ScanError::config_error("destination path is required"));
        }
        if !self.destination_path.is_dir() {
            return Err(ScanError::DestinationNotFound(
                self.destination_path.clone(),
            ));
        }

        // Output written under the source would be scanned as it is written
        let source = self
            .source_path
            .canonicalize()
            .map_err(|e| ScanError::from_io(&self.source_path, e))?;
        let destination = self
            .destination_path
            .canonicalize()
            .map_err(|e| ScanError::from_io(&self.destination_path, e))?;
        if destination.starts_with(&source) {
            return Err(ScanError::DestinationInsideSource(
                self.destination_path.clone(),
                self.source_path.clone(),
            ));
        }

        self.pattern().map(|_| ())
    }
}
