use std::path::{Path, PathBuf};

use crate::errors::{ScanError, ScanResult};
use crate::results::{FileOutcome, FileRecord};

/// Consumer of the records produced by a traversal.
///
/// Calls are synchronous; an `Err` from either method ends the run, since it
/// means the classification itself can no longer be recorded.
pub trait RecordSink {
    /// Receives the record for one regular file
    fn accept(&mut self, record: &FileRecord) -> ScanResult<()>;

    /// Called when a directory could not be listed and its subtree was skipped
    fn directory_failed(&mut self, _path: &Path, _error: &ScanError) -> ScanResult<()> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn accept(&mut self, record: &FileRecord) -> ScanResult<()> {
        (**self).accept(record)
    }

    fn directory_failed(&mut self, path: &Path, error: &ScanError) -> ScanResult<()> {
        (**self).directory_failed(path, error)
    }
}

/// Keeps every classification in memory
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    /// Files containing the pattern, with their sizes
    pub found: Vec<(PathBuf, u64)>,
    /// Files without the pattern, with their sizes
    pub not_found: Vec<(PathBuf, u64)>,
    /// Files that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
    /// Directories that could not be listed, with the reason
    pub failed_directories: Vec<(PathBuf, String)>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of files seen in any category
    pub fn len(&self) -> usize {
        self.found.len() + self.not_found.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted paths of the files containing the pattern
    pub fn found_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.found.iter().map(|(p, _)| p.clone()).collect();
        paths.sort();
        paths
    }

    /// Sorted paths of the files without the pattern
    pub fn not_found_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.not_found.iter().map(|(p, _)| p.clone()).collect();
        paths.sort();
        paths
    }
}

impl RecordSink for CollectingSink {
    fn accept(&mut self, record: &FileRecord) -> ScanResult<()> {
        match &record.outcome {
            FileOutcome::Matched => self.found.push((record.path.clone(), record.size)),
            FileOutcome::NotMatched => self.not_found.push((record.path.clone(), record.size)),
            FileOutcome::Failed(e) => self.failed.push((record.path.clone(), e.to_string())),
        }
        Ok(())
    }

    fn directory_failed(&mut self, path: &Path, error: &ScanError) -> ScanResult<()> {
        self.failed_directories
            .push((path.to_path_buf(), error.to_string()));
        Ok(())
    }
}
