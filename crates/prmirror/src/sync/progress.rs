//! Progress reporting for scan operations.

use chrono::NaiveDateTime;

use crate::store::ResolveOutcome;

/// Progress events emitted during a scan.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Enumerated the repositories of an owner.
    EnumeratingRepositories {
        owner: String,
        count: usize,
    },

    /// Starting to scan a repository.
    ScanningRepository {
        owner: String,
        name: String,
        /// The cursor the scan runs from; `None` on a first run.
        since: Option<NaiveDateTime>,
        newest_first: bool,
    },

    /// Assembled one pull request and resolved its nested entities.
    PullRequestAssembled {
        number: i64,
        outcome: ResolveOutcome,
    },

    /// Dropped one pull request from this run after a transient failure.
    PullRequestSkipped {
        number: i64,
        error: String,
    },

    /// Committed a checkpoint batch.
    BatchFlushed {
        /// Zero-based batch index within the repository scan.
        index: usize,
        /// Pull requests in this batch; the final batch may hold fewer.
        pull_requests: usize,
    },

    /// Finished scanning a repository.
    ScanComplete {
        owner: String,
        name: String,
        processed: usize,
        batches: usize,
        skipped: usize,
    },

    /// Warning message (non-fatal).
    Warning {
        message: String,
    },
}

/// Callback for progress updates during scan operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn emit_with_callback_invokes_it() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let callback: ProgressCallback = Box::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        emit(
            Some(&callback),
            SyncProgress::BatchFlushed {
                index: 0,
                pull_requests: 5,
            },
        );
        emit(
            Some(&callback),
            SyncProgress::ScanComplete {
                owner: "octo-org".to_string(),
                name: "widgets".to_string(),
                processed: 5,
                batches: 1,
                skipped: 0,
            },
        );

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn emit_without_callback_is_a_no_op() {
        emit(
            None,
            SyncProgress::Warning {
                message: "nothing listens".to_string(),
            },
        );
    }

    #[test]
    fn events_capture_their_context() {
        let event = SyncProgress::PullRequestSkipped {
            number: 7,
            error: "Server error: HTTP 502".to_string(),
        };
        let debug = format!("{event:?}");
        assert!(debug.contains("7"));
        assert!(debug.contains("502"));
    }
}
