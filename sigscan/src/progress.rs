use indicatif::{HumanBytes, HumanCount, ProgressBar, ProgressStyle};
use std::fmt;
use std::time::Duration;

use crate::results::RunCounters;

/// Live running totals shown while a scan is in progress
#[derive(Clone, Default)]
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("hidden", &self.is_hidden())
            .finish()
    }
}

impl ProgressReporter {
    /// A reporter that draws nothing
    pub fn hidden() -> Self {
        Self { bar: None }
    }

    /// A spinner on stderr followed by the running totals
    pub fn spinner() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar: Some(bar) }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_none()
    }

    /// Formats the running totals line
    pub fn message(counters: &RunCounters) -> String {
        format!(
            "processed {} files in {} bytes ({}), found pattern in {} files",
            HumanCount(counters.files_processed),
            HumanCount(counters.bytes_processed),
            HumanBytes(counters.bytes_processed),
            HumanCount(counters.files_matched)
        )
    }

    pub fn update(&self, counters: &RunCounters) {
        if let Some(bar) = &self.bar {
            bar.set_message(Self::message(counters));
        }
    }

    pub fn finish(&self, counters: &RunCounters) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(Self::message(counters));
        }
    }
}
