use indicatif::HumanCount;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::SystemTime;

use crate::errors::{ScanError, ScanResult};
use crate::results::{FileOutcome, FileRecord, RunCounters};
use crate::search::Pattern;
use crate::sink::RecordSink;

pub const EVENT_LOG_FILE: &str = "log.txt";
pub const NOT_FOUND_LIST_FILE: &str = "files_no_pattern.txt";
pub const FOUND_LIST_FILE: &str = "files_with_pattern.txt";

/// Application event log: one `<timestamp>: <message>` line per event
#[derive(Debug)]
pub struct EventLog<W: Write> {
    out: W,
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Appends one timestamped line
    pub fn log(&mut self, msg: impl Display) -> ScanResult<()> {
        let now = humantime::format_rfc3339_seconds(SystemTime::now());
        writeln!(self.out, "{}: {}", now, msg)?;
        Ok(())
    }

    pub fn flush(&mut self) -> ScanResult<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Writes the "pattern found" and "no pattern found" lists plus the event
/// log. Matched and unmatched files become `path,size` lines in their list,
/// failures become event log entries.
#[derive(Debug)]
pub struct ClassificationLog<W: Write> {
    found: W,
    not_found: W,
    events: EventLog<W>,
}

impl ClassificationLog<BufWriter<File>> {
    /// Creates the three output files inside `dir`, truncating old ones
    pub fn create(dir: &Path) -> ScanResult<Self> {
        let create = |name: &str| -> ScanResult<BufWriter<File>> {
            let path = dir.join(name);
            let file = File::create(&path).map_err(|e| ScanError::from_io(&path, e))?;
            Ok(BufWriter::new(file))
        };

        Ok(Self::new(
            create(FOUND_LIST_FILE)?,
            create(NOT_FOUND_LIST_FILE)?,
            create(EVENT_LOG_FILE)?,
        ))
    }
}

impl<W: Write> ClassificationLog<W> {
    pub fn new(found: W, not_found: W, events: W) -> Self {
        Self {
            found,
            not_found,
            events: EventLog::new(events),
        }
    }

    /// Writes the start-of-run entries to the event log
    pub fn begin(
        &mut self,
        source: &Path,
        destination: &Path,
        pattern: &Pattern,
    ) -> ScanResult<()> {
        self.events.log(format_args!(
            "sigscan {}: Application started",
            env!("CARGO_PKG_VERSION")
        ))?;
        self.events
            .log(format_args!("Source directory path: {}", source.display()))?;
        self.events.log(format_args!(
            "Destination path for the lists: {}",
            destination.display()
        ))?;
        self.events
            .log(format_args!("Search pattern: {}", pattern))?;
        self.events.log("Processing data")
    }

    /// Writes the totals lines, flushes everything and hands back the
    /// writers as (found, not found, events)
    pub fn finish(mut self, counters: &RunCounters) -> ScanResult<(W, W, W)> {
        writeln!(
            self.found,
            "Total: {} files",
            HumanCount(counters.files_matched)
        )?;
        writeln!(
            self.not_found,
            "Total: {} files",
            HumanCount(counters.files_not_matched())
        )?;
        self.events.log(format_args!(
            "Processed {} bytes in {} files, found {} files with pattern, \
             unable to process {} files, unable to read {} directories",
            HumanCount(counters.bytes_processed),
            HumanCount(counters.files_processed),
            HumanCount(counters.files_matched),
            HumanCount(counters.files_failed),
            HumanCount(counters.directories_failed)
        ))?;
        self.events.log("Done")?;

        self.found.flush()?;
        self.not_found.flush()?;
        self.events.flush()?;
        Ok((self.found, self.not_found, self.events.into_inner()))
    }
}

impl<W: Write> RecordSink for ClassificationLog<W> {
    fn accept(&mut self, record: &FileRecord) -> ScanResult<()> {
        match &record.outcome {
            FileOutcome::Matched => {
                writeln!(self.found, "{},{}", record.path.display(), record.size)?;
            }
            FileOutcome::NotMatched => {
                writeln!(self.not_found, "{},{}", record.path.display(), record.size)?;
            }
            FileOutcome::Failed(e) => {
                self.events.log(format_args!(
                    "Unable to process file: {}, reason: {}",
                    record.path.display(),
                    e
                ))?;
            }
        }
        Ok(())
    }

    fn directory_failed(&mut self, path: &Path, error: &ScanError) -> ScanResult<()> {
        self.events.log(format_args!(
            "Unable to read directory: {}, reason: {}",
            path.display(),
            error
        ))
    }
}
