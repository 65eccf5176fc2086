//! Per-file records and run-wide counters.
//!
//! A [`FileRecord`] is produced once for every regular file the traversal
//! reaches. It is handed to a sink by reference and dropped straight after,
//! so a run never holds more than one record at a time:
//!
//! ```rust,ignore
//! let record = processor.process_file(&path);
//! sink.accept(&record)?;
//! counters.record(&record);
//! ```
//!
//! [`RunCounters`] is a plain value owned by the traversal call and returned
//! to the caller when the walk finishes.
use serde::Serialize;
use std::path::PathBuf;

use crate::errors::ScanError;

/// Outcome of testing one file against the pattern
#[derive(Debug)]
pub enum FileOutcome {
    Matched,
    NotMatched,
    Failed(ScanError),
}

impl FileOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Classification of a single regular file
#[derive(Debug)]
pub struct FileRecord {
    /// The path to the file
    pub path: PathBuf,
    /// Size reported by the file's metadata, 0 if it could not be read
    pub size: u64,
    /// What happened when the file was tested
    pub outcome: FileOutcome,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, size: u64, outcome: FileOutcome) -> Self {
        Self {
            path: path.into(),
            size,
            outcome,
        }
    }

    pub fn failed(path: impl Into<PathBuf>, size: u64, error: ScanError) -> Self {
        Self::new(path, size, FileOutcome::Failed(error))
    }
}

/// Running totals for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    /// Files classified as matched or not matched
    pub files_processed: u64,
    /// Total size of the files counted in `files_processed`
    pub bytes_processed: u64,
    /// Files in which the pattern was found
    pub files_matched: u64,
    /// Files that could not be stat'ed, opened or read
    pub files_failed: u64,
    /// Directories that could not be listed
    pub directories_failed: u64,
}

impl RunCounters {
    /// Creates a zeroed set of counters
    pub fn new() -> Self {
        Default::default()
    }

    /// Folds one file record into the totals
    pub fn record(&mut self, record: &FileRecord) {
        match record.outcome {
            FileOutcome::Matched => {
                self.files_processed += 1;
                self.files_matched += 1;
                self.bytes_processed += record.size;
            }
            FileOutcome::NotMatched => {
                self.files_processed += 1;
                self.bytes_processed += record.size;
            }
            FileOutcome::Failed(_) => self.files_failed += 1,
        }
    }

    pub fn record_directory_failure(&mut self) {
        self.directories_failed += 1;
    }

    pub fn files_not_matched(&self) -> u64 {
        self.files_processed - self.files_matched
    }

    /// Every regular file reached, whatever its outcome
    pub fn files_seen(&self) -> u64 {
        self.files_processed + self.files_failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_counters_new() {
        let counters = RunCounters::new();
        assert_eq!(counters.files_processed, 0);
        assert_eq!(counters.bytes_processed, 0);
        assert_eq!(counters.files_matched, 0);
        assert_eq!(counters.files_failed, 0);
        assert_eq!(counters.directories_failed, 0);
    }

    #[test]
    fn test_record_each_outcome() {
        let mut counters = RunCounters::new();

        counters.record(&FileRecord::new("a.txt", 11, FileOutcome::Matched));
        counters.record(&FileRecord::new("b.txt", 0, FileOutcome::NotMatched));
        counters.record(&FileRecord::new("c.txt", 7, FileOutcome::NotMatched));
        counters.record(&FileRecord::failed(
            "d.bin",
            0,
            ScanError::permission_denied("d.bin"),
        ));

        assert_eq!(counters.files_processed, 3);
        assert_eq!(counters.files_matched, 1);
        assert_eq!(counters.files_not_matched(), 2);
        assert_eq!(counters.files_failed, 1);
        assert_eq!(counters.bytes_processed, 18);
        assert_eq!(counters.files_seen(), 4);
    }

    #[test]
    fn test_failed_record_adds_no_bytes() {
        let mut counters = RunCounters::new();
        counters.record(&FileRecord::failed(
            "big.bin",
            4096,
            ScanError::IoError(std::io::Error::other("read failed")),
        ));

        assert_eq!(counters.bytes_processed, 0);
        assert_eq!(counters.files_processed, 0);
        assert_eq!(counters.files_failed, 1);
    }

    #[test]
    fn test_directory_failures_are_separate() {
        let mut counters = RunCounters::new();
        counters.record_directory_failure();
        counters.record_directory_failure();

        assert_eq!(counters.directories_failed, 2);
        assert_eq!(counters.files_seen(), 0);
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(FileOutcome::Matched.is_matched());
        assert!(!FileOutcome::NotMatched.is_matched());
        assert!(FileOutcome::Failed(ScanError::file_not_found("x")).is_failed());
    }

    #[test]
    fn test_counters_serialize() {
        let counters = RunCounters {
            files_processed: 2,
            bytes_processed: 11,
            files_matched: 1,
            files_failed: 1,
            directories_failed: 0,
        };
        let json = serde_json::to_value(counters).unwrap();
        assert_eq!(json["files_processed"], 2);
        assert_eq!(json["bytes_processed"], 11);
        assert_eq!(json["files_matched"], 1);
        assert_eq!(json["files_failed"], 1);
    }
}
