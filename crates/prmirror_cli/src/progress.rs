//! Structured-logging progress reporter.

use prmirror::store::ResolveOutcome;
use prmirror::sync::SyncProgress;

/// Reports scan progress through tracing.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::EnumeratingRepositories { owner, count } => {
                tracing::info!(owner = %owner, count, "Enumerated repositories");
            }

            SyncProgress::ScanningRepository {
                owner,
                name,
                since,
                newest_first,
            } => {
                tracing::info!(
                    repo = %format!("{owner}/{name}"),
                    since = ?since,
                    newest_first,
                    "Scanning repository"
                );
            }

            SyncProgress::PullRequestAssembled { number, outcome } => match outcome {
                ResolveOutcome::Unchanged => {
                    tracing::debug!(number, "Pull request already current");
                }
                ResolveOutcome::Created | ResolveOutcome::Updated => {
                    tracing::debug!(number, outcome = ?outcome, "Assembled pull request");
                }
            },

            SyncProgress::PullRequestSkipped { number, error } => {
                tracing::warn!(number, error = %error, "Skipped pull request");
            }

            SyncProgress::BatchFlushed {
                index,
                pull_requests,
            } => {
                tracing::debug!(index, pull_requests, "Flushed checkpoint batch");
            }

            SyncProgress::ScanComplete {
                owner,
                name,
                processed,
                batches,
                skipped,
            } => {
                tracing::info!(
                    repo = %format!("{owner}/{name}"),
                    processed,
                    batches,
                    skipped,
                    "Scan complete"
                );
            }

            SyncProgress::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
