//! Scan options, outcomes, and constants.

use chrono::NaiveDateTime;

use crate::store::ResolveOutcome;

use super::assembler::AssembledPullRequest;
use super::error::SyncError;

/// Default number of pull requests per checkpoint batch.
///
/// Small on purpose: one batch should cost roughly one rate-limit budget's
/// worth of API calls, so an interrupted run loses little.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Options for scanning a repository.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Cursor override. When unset, the cursor is derived from the most
    /// recently synchronized pull request of the repository.
    pub since: Option<NaiveDateTime>,
    /// Scan in descending update order, prioritizing fresh activity over
    /// backlog on a time-boxed run.
    pub newest_first: bool,
    /// Pull requests per checkpoint batch.
    pub batch_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            since: None,
            newest_first: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// A pull request dropped from the current run after a transient failure.
#[derive(Debug, Clone)]
pub struct SkippedPullRequest {
    pub number: i64,
    pub error: String,
}

/// Result of scanning one repository.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Pull requests assembled (excluding skipped ones and plain issues).
    pub processed: usize,
    /// Pull requests newly inserted.
    pub created: usize,
    /// Pull requests whose mutable fields were refreshed.
    pub updated: usize,
    /// Pull requests already current.
    pub unchanged: usize,
    /// Checkpoint batches committed.
    pub batches: usize,
    /// Pull requests dropped from this run. Not recorded as permanently
    /// failed anywhere else.
    pub skipped: Vec<SkippedPullRequest>,
    /// The cursor this scan ran from.
    pub since: Option<NaiveDateTime>,
}

impl ScanOutcome {
    pub(crate) fn starting_from(since: Option<NaiveDateTime>) -> Self {
        Self {
            since,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, assembled: &AssembledPullRequest) {
        self.processed += 1;
        match assembled.outcome {
            ResolveOutcome::Created => self.created += 1,
            ResolveOutcome::Updated => self.updated += 1,
            ResolveOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Result of scanning one repository within an owner-wide run.
#[derive(Debug)]
pub struct RepositoryScan {
    pub owner: String,
    pub name: String,
    /// Per-repository outcome; an `Err` here aborted only this repository.
    pub result: Result<ScanOutcome, SyncError>,
}
