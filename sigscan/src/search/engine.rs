use ignore::{DirEntry, WalkBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use super::matcher::{Pattern, PatternMatcher};
use super::processor::FileProcessor;
use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::progress::ProgressReporter;
use crate::report::ClassificationLog;
use crate::results::{FileRecord, RunCounters};
use crate::sink::RecordSink;

/// What a directory entry turned out to be
enum EntryKind {
    File,
    Directory,
    Other,
}

/// Resolves the kind of `entry`. Symlinks to files count as files; symlinks
/// to directories are not followed.
fn entry_kind(entry: &DirEntry) -> io::Result<EntryKind> {
    let file_type = match entry.file_type() {
        Some(ft) => ft,
        None => return Ok(EntryKind::Other),
    };

    if file_type.is_file() {
        return Ok(EntryKind::File);
    }
    if file_type.is_dir() {
        return Ok(EntryKind::Directory);
    }
    if file_type.is_symlink() && fs::metadata(entry.path())?.is_file() {
        return Ok(EntryKind::File);
    }
    Ok(EntryKind::Other)
}

/// Splits a walk error into the path it concerns and the underlying I/O error
fn split_walk_error(err: ignore::Error) -> (Option<PathBuf>, io::Error) {
    match err {
        ignore::Error::WithPath { path, err } => {
            let (_, source) = split_walk_error(*err);
            (Some(path), source)
        }
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            split_walk_error(*err)
        }
        ignore::Error::Io(source) => (None, source),
        other => (None, io::Error::other(other.to_string())),
    }
}

/// Walks a directory tree and classifies every regular file in it
#[derive(Debug)]
pub struct Traverser {
    processor: FileProcessor,
    progress: ProgressReporter,
}

impl Traverser {
    /// Creates a traverser searching for `pattern`, without progress output
    pub fn new(pattern: &Pattern) -> Self {
        Self {
            processor: FileProcessor::new(PatternMatcher::new(pattern)),
            progress: ProgressReporter::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Walks `root` depth-first in file name order, sending one record per
    /// regular file to `sink`. No filters are applied and symlinked
    /// directories are not entered.
    ///
    /// Unreadable files and directories are reported to the sink and
    /// counted; only an invalid root or a failing sink ends the walk early.
    pub fn run<S: RecordSink + ?Sized>(
        &self,
        root: &Path,
        sink: &mut S,
    ) -> ScanResult<RunCounters> {
        let metadata = fs::metadata(root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ScanError::SourceNotFound(root.to_path_buf()),
            _ => ScanError::from_io(root, e),
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        info!("Starting scan of {}", root.display());

        let mut walker = WalkBuilder::new(root);
        walker
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut counters = RunCounters::new();

        for result in walker.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    let (path, source) = split_walk_error(err);
                    let dir = path.unwrap_or_else(|| root.to_path_buf());
                    let error = ScanError::directory_unreadable(&dir, source);
                    warn!("Skipping directory {}: {}", dir.display(), error);
                    sink.directory_failed(&dir, &error)?;
                    counters.record_directory_failure();
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }

            let path = entry.path();
            match entry_kind(&entry) {
                Ok(EntryKind::File) => {
                    let record = self.processor.process_file(path);
                    self.emit(record, sink, &mut counters)?;
                }
                Ok(EntryKind::Directory) => debug!("Entering directory: {}", path.display()),
                Ok(EntryKind::Other) => trace!("Skipping non-regular entry: {}", path.display()),
                Err(e) => {
                    warn!("Unable to inspect {}: {}", path.display(), e);
                    let error = ScanError::from_io(path, e);
                    let record = FileRecord::failed(path, 0, error);
                    self.emit(record, sink, &mut counters)?;
                }
            }
        }

        self.progress.finish(&counters);
        self.processor.metrics().log_stats();

        info!(
            "Scan complete. {} bytes in {} files, {} matched, {} failed, {} unreadable directories",
            counters.bytes_processed,
            counters.files_processed,
            counters.files_matched,
            counters.files_failed,
            counters.directories_failed
        );

        Ok(counters)
    }

    fn emit<S: RecordSink + ?Sized>(
        &self,
        record: FileRecord,
        sink: &mut S,
        counters: &mut RunCounters,
    ) -> ScanResult<()> {
        sink.accept(&record)?;
        counters.record(&record);
        self.progress.update(counters);
        Ok(())
    }
}

/// Walks `root` and classifies every regular file against `pattern`
pub fn traverse<S: RecordSink + ?Sized>(
    root: &Path,
    pattern: &Pattern,
    sink: &mut S,
) -> ScanResult<RunCounters> {
    Traverser::new(pattern).run(root, sink)
}

/// Runs a complete scan as described by `config`: validates it, writes the
/// found and not-found lists and the event log into the destination
/// directory, and returns the final counters.
pub fn scan(config: &ScanConfig) -> ScanResult<RunCounters> {
    config.validate()?;
    let pattern = config.pattern()?;

    info!("Starting scan with pattern: {}", pattern);

    let mut log = ClassificationLog::create(&config.destination_path)?;
    log.begin(&config.source_path, &config.destination_path, &pattern)?;

    let progress = if config.show_progress {
        ProgressReporter::spinner()
    } else {
        ProgressReporter::hidden()
    };

    let counters = Traverser::new(&pattern)
        .with_progress(progress)
        .run(&config.source_path, &mut log)?;

    log.finish(&counters)?;
    Ok(counters)
}
