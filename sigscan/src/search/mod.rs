//! Scan-and-classify engine.
//!
//! Three layers, leaf first:
//!
//! 1. [`PatternMatcher`] answers "does this byte sequence occur in this
//!    content", either on a slice or streamed from a reader.
//! 2. [`FileProcessor`] turns one path into a [`FileRecord`](crate::FileRecord),
//!    picking a read strategy by file size (whole read, buffered stream or
//!    memory map) and folding every I/O error into the record.
//! 3. [`Traverser`] walks the tree in file name order with an unfiltered
//!    `ignore` walker, feeds each record to a [`RecordSink`](crate::RecordSink)
//!    and keeps the [`RunCounters`](crate::RunCounters).
//!
//! ```rust,ignore
//! let pattern = Pattern::from_ascii("Data Recovery Labs")?;
//! let mut sink = CollectingSink::new();
//! let counters = traverse(Path::new("/mnt/evidence"), &pattern, &mut sink)?;
//! println!("{} of {} files matched", counters.files_matched, counters.files_seen());
//! ```
//!
//! Everything runs on the calling thread. Each file is opened, searched and
//! closed before the next entry is looked at.
pub mod engine;
pub mod matcher;
pub mod processor;

pub use engine::{scan, traverse, Traverser};
pub use matcher::{Pattern, PatternMatcher};
pub use processor::FileProcessor;
