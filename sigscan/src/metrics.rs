use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::search::processor::{LARGE_FILE_THRESHOLD, SMALL_FILE_THRESHOLD};

/// Tracks which read strategy each file took during a run
#[derive(Debug, Default)]
pub struct ProcessingMetrics {
    empty_files: AtomicU64,
    small_files: AtomicU64,
    buffered_files: AtomicU64,
    mmap_files: AtomicU64,
    mmap_bytes: AtomicU64,
}

impl ProcessingMetrics {
    /// Creates a new ProcessingMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the strategy chosen for a file of `size` bytes
    pub fn record_file_processing(&self, size: u64) {
        if size == 0 {
            self.empty_files.fetch_add(1, Ordering::Relaxed);
        } else if size < SMALL_FILE_THRESHOLD {
            self.small_files.fetch_add(1, Ordering::Relaxed);
        } else if size >= LARGE_FILE_THRESHOLD {
            self.mmap_files.fetch_add(1, Ordering::Relaxed);
        } else {
            self.buffered_files.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records a memory mapping
    pub fn record_mmap(&self, bytes: u64) {
        let total = self.mmap_bytes.fetch_add(bytes, Ordering::Relaxed) + bytes;
        debug!("Memory mapped: {} bytes, total mapped: {} bytes", bytes, total);
    }

    /// Gets the current statistics
    pub fn get_stats(&self) -> ProcessingStats {
        ProcessingStats {
            empty_files: self.empty_files.load(Ordering::Relaxed),
            small_files: self.small_files.load(Ordering::Relaxed),
            buffered_files: self.buffered_files.load(Ordering::Relaxed),
            mmap_files: self.mmap_files.load(Ordering::Relaxed),
            mmap_bytes: self.mmap_bytes.load(Ordering::Relaxed),
        }
    }

    /// Logs the current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Read strategy stats:\n\
             Files processed (empty/small/buffered/mmap): {}/{}/{}/{}\n\
             Memory mapped: {} bytes",
            stats.empty_files,
            stats.small_files,
            stats.buffered_files,
            stats.mmap_files,
            stats.mmap_bytes
        );
    }
}

/// Snapshot of [`ProcessingMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub empty_files: u64,
    pub small_files: u64,
    pub buffered_files: u64,
    pub mmap_files: u64,
    pub mmap_bytes: u64,
}
