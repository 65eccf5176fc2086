pub mod config;
pub mod errors;
pub mod metrics;
pub mod progress;
pub mod report;
pub mod results;
pub mod search;
pub mod sink;

pub use config::{CliOverrides, ScanConfig};
pub use errors::{ScanError, ScanResult};
pub use progress::ProgressReporter;
pub use report::ClassificationLog;
pub use results::{FileOutcome, FileRecord, RunCounters};
pub use search::{scan, traverse, Pattern, PatternMatcher, Traverser};
pub use sink::{CollectingSink, RecordSink};
