use memmap2::Mmap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{trace, warn};

use super::matcher::{PatternMatcher, CHUNK_SIZE};
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ProcessingMetrics;
use crate::results::{FileOutcome, FileRecord};

// Constants for file processing
pub(crate) const SMALL_FILE_THRESHOLD: u64 = 32 * 1024; // 32KB
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

fn open(path: &Path) -> ScanResult<File> {
    File::open(path).map_err(|e| ScanError::from_io(path, e))
}

/// Tests single files against the pattern
#[derive(Debug)]
pub struct FileProcessor {
    matcher: PatternMatcher,
    metrics: ProcessingMetrics,
}

impl FileProcessor {
    /// Creates a new FileProcessor with the given pattern matcher
    pub fn new(matcher: PatternMatcher) -> Self {
        Self {
            matcher,
            metrics: ProcessingMetrics::new(),
        }
    }

    /// Gets the read strategy metrics
    pub fn metrics(&self) -> &ProcessingMetrics {
        &self.metrics
    }

    /// Reads a small file into memory in one call
    fn search_small_file(&self, path: &Path) -> ScanResult<bool> {
        trace!("Using whole-file read for: {}", path.display());
        let bytes = std::fs::read(path).map_err(|e| ScanError::from_io(path, e))?;
        Ok(self.matcher.is_match(&bytes))
    }

    /// Streams a file through a buffered reader
    fn search_file_buffered(&self, path: &Path) -> ScanResult<bool> {
        trace!("Using buffered read for: {}", path.display());
        let reader = BufReader::with_capacity(CHUNK_SIZE, open(path)?);
        self.matcher
            .is_match_reader(reader)
            .map_err(|e| ScanError::from_io(path, e))
    }

    /// Searches a file through a read-only memory mapping
    fn search_mmap_file(&self, path: &Path) -> ScanResult<bool> {
        trace!("Using memory map for: {}", path.display());
        let file = open(path)?;

        // The mapping is read-only and dropped before this function returns.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| ScanError::from_io(path, e))?;
        self.metrics.record_mmap(mmap.len() as u64);

        Ok(self.matcher.is_match(&mmap))
    }

    /// Classifies one file.
    ///
    /// Never returns an error: anything that goes wrong while reading the
    /// file ends up as [`FileOutcome::Failed`] in the returned record.
    pub fn process_file(&self, path: &Path) -> FileRecord {
        trace!("Processing file: {}", path.display());

        let size = match path.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("Failed to get metadata for {}: {}", path.display(), e);
                return FileRecord::failed(path, 0, ScanError::from_io(path, e));
            }
        };
        self.metrics.record_file_processing(size);

        if size == 0 {
            return FileRecord::new(path, 0, FileOutcome::NotMatched);
        }

        // Choose processing strategy based on file size
        let found = if size < SMALL_FILE_THRESHOLD {
            self.search_small_file(path)
        } else if size >= LARGE_FILE_THRESHOLD {
            self.search_mmap_file(path)
        } else {
            self.search_file_buffered(path)
        };

        match found {
            Ok(true) => FileRecord::new(path, size, FileOutcome::Matched),
            Ok(false) => FileRecord::new(path, size, FileOutcome::NotMatched),
            Err(e) => {
                warn!("Unable to process file {}: {}", path.display(), e);
                FileRecord::failed(path, size, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::matcher::Pattern;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn processor(pattern: &str) -> FileProcessor {
        FileProcessor::new(PatternMatcher::new(&Pattern::from_ascii(pattern).unwrap()))
    }

    #[test]
    fn test_small_file_match() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("a.txt");
        std::fs::write(&file_path, "hello world").unwrap();

        let record = processor("world").process_file(&file_path);
        assert!(record.outcome.is_matched());
        assert_eq!(record.size, 11);
        assert_eq!(record.path, file_path);
    }

    #[test]
    fn test_small_file_no_match() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("a.txt");
        std::fs::write(&file_path, "hello there").unwrap();

        let record = processor("world").process_file(&file_path);
        assert!(matches!(record.outcome, FileOutcome::NotMatched));
        assert_eq!(record.size, 11);
    }

    #[test]
    fn test_empty_file_is_not_matched() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.txt");
        File::create(&file_path).unwrap();

        let processor = processor("x");
        let record = processor.process_file(&file_path);
        assert!(matches!(record.outcome, FileOutcome::NotMatched));
        assert_eq!(record.size, 0);
        assert_eq!(processor.metrics().get_stats().empty_files, 1);
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("gone.txt");

        let record = processor("x").process_file(&file_path);
        assert!(matches!(
            record.outcome,
            FileOutcome::Failed(ScanError::FileNotFound(_))
        ));
        assert_eq!(record.size, 0);
    }

    #[test]
    fn test_buffered_file_match_at_end() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("medium.bin");
        let mut content = vec![b'.'; 200 * 1024];
        let tail = content.len() - 9;
        content[tail..].copy_from_slice(b"SIGNATURE");
        std::fs::write(&file_path, &content).unwrap();

        let processor = processor("SIGNATURE");
        let record = processor.process_file(&file_path);
        assert!(record.outcome.is_matched());
        assert_eq!(record.size, content.len() as u64);
        assert_eq!(processor.metrics().get_stats().buffered_files, 1);
    }

    #[test]
    fn test_buffered_file_match_across_chunks() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("medium.bin");
        let mut content = vec![b'.'; 3 * CHUNK_SIZE];
        let offset = CHUNK_SIZE - 4;
        content[offset..offset + 10].copy_from_slice(b"0123456789");
        std::fs::write(&file_path, &content).unwrap();

        let record = processor("0123456789").process_file(&file_path);
        assert!(record.outcome.is_matched());
    }

    #[test]
    fn test_mmap_file_match() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("large.bin");
        let mut file = File::create(&file_path).unwrap();

        let block = vec![b'x'; 1024 * 1024];
        for _ in 0..10 {
            file.write_all(&block).unwrap();
        }
        file.write_all(b"needle").unwrap();
        drop(file);

        let processor = processor("needle");
        let record = processor.process_file(&file_path);
        assert!(record.outcome.is_matched());

        let stats = processor.metrics().get_stats();
        assert_eq!(stats.mmap_files, 1);
        assert_eq!(stats.mmap_bytes, record.size);
    }

    #[test]
    fn test_read_only_file_is_processed() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("ro.txt");
        std::fs::write(&file_path, "read only signature").unwrap();
        let mut perms = std::fs::metadata(&file_path).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&file_path, perms).unwrap();

        let record = processor("signature").process_file(&file_path);
        assert!(record.outcome.is_matched());
    }
}
