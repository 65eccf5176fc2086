//! Error types for sigscan.
//!
//! Errors fall into two groups. Per-file and per-directory failures are
//! carried inside the records handed to a sink and never stop a run:
//!
//! ```rust,ignore
//! match record.outcome {
//!     FileOutcome::Matched => found += 1,
//!     FileOutcome::NotMatched => {}
//!     FileOutcome::Failed(ScanError::PermissionDenied(path)) => skipped.push(path),
//!     FileOutcome::Failed(e) => eprintln!("{}", e),
//! }
//! ```
//!
//! Everything else (bad configuration, a missing source or destination,
//! output that cannot be written) is returned as `Err` and ends the run.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while configuring or running a scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Source path {0} does not exist")]
    SourceNotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Destination path {0} does not exist")]
    DestinationNotFound(PathBuf),
    #[error("Destination path {0} lies inside the source tree {1}")]
    DestinationInsideSource(PathBuf, PathBuf),
    #[error("Unable to read directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl ScanError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn directory_unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DirectoryUnreadable {
            path: path.into(),
            source,
        }
    }

    /// Maps an I/O error raised while touching `path`, keeping the path for
    /// the common not-found and permission cases.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::file_not_found(path),
            io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}
