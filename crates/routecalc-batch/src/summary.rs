//! Per-record outcomes and the run summary.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::table::RecordUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Origin or destination cell is missing or has no location text.
    InvalidInput,
    /// The provider answered but produced nothing writable (no route, or no
    /// value for any selected output field).
    NoUsableResult,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::InvalidInput => "missing or invalid location data",
            SkipReason::NoUsableResult => "no usable result",
        })
    }
}

/// What happened to one attempted record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Values accepted for write-back; counted as updated once flushed.
    Updated(RecordUpdate),
    Skipped(SkipReason),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Completed,
    Stopped,
    /// A batch write failed; earlier batches stay written.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub record_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Records returned by the pager.
    pub fetched: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub batches_written: usize,
    /// Updates computed in a batch that was stopped before its write.
    pub discarded_updates: usize,
    pub failures: Vec<RecordFailure>,
}

impl RunSummary {
    pub(crate) fn start() -> Self {
        Self {
            state: RunState::Completed,
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            fetched: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            batches_written: 0,
            discarded_updates: 0,
            failures: Vec::new(),
        }
    }

    /// Records that reached a final outcome (discarded updates excluded).
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.updated + self.skipped + self.failed
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state == RunState::Stopped
    }

    pub(crate) fn record_failure(&mut self, record_id: &str, message: String) {
        self.failed += 1;
        self.failures.push(RecordFailure {
            record_id: record_id.to_string(),
            message,
        });
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        let lead = match self.state {
            RunState::Completed => "completed in",
            RunState::Stopped => "stopped after",
            RunState::Aborted => "aborted after",
        };
        write!(
            f,
            "{lead} {secs:.2}s: {} updated, {} skipped, {} failed",
            self.updated, self.skipped, self.failed
        )?;
        if self.state != RunState::Completed && self.discarded_updates > 0 {
            write!(f, " ({} computed but not written)", self.discarded_updates)?;
        }
        Ok(())
    }
}
