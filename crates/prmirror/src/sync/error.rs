//! Scan error taxonomy and the failure classifier.
//!
//! Failures surfaced while contacting the remote side land in one of three
//! buckets: skip the current pull request, abort the current repository, or
//! abort the whole run. [`classify`] decides the per-item disposition;
//! [`SyncError::aborts_run`] separates run-fatal conditions from
//! per-repository ones when scanning a whole account.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::github::GitHubError;
use crate::store::StoreError;

/// Errors that can end a repository scan or a whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The named owner does not exist. Raised before any scanning begins.
    #[error("Owner not found: {owner}")]
    UnknownOwner { owner: String },

    /// The named repository does not exist. Raised before any scanning begins.
    #[error("Repository not found: {owner}/{name}")]
    UnknownRepository { owner: String, name: String },

    /// Bad credentials. No further repositories are attempted.
    #[error("Authentication failed")]
    Authentication,

    /// Rate limited. Distinct from [`SyncError::Authentication`] so the
    /// caller can wait and resume later from the last persisted cursor.
    #[error("Rate limit exceeded{}", reset_display(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    /// Any other remote failure; aborts the current repository.
    #[error("Remote API failure: {message}")]
    Remote { message: String },

    /// Persistence failure; surfaced immediately, no partial-batch retry.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn reset_display(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => format!(". Resets at {at}"),
        None => String::new(),
    }
}

impl SyncError {
    /// Map a remote error that escaped item-level classification.
    pub(crate) fn from_remote(e: GitHubError) -> Self {
        match e {
            GitHubError::AuthRequired => Self::Authentication,
            GitHubError::RateLimited { reset_at } => Self::RateLimited { reset_at },
            other => Self::Remote {
                message: other.to_string(),
            },
        }
    }

    /// Whether the condition is fatal for the whole run, as opposed to the
    /// current repository only.
    pub fn aborts_run(&self) -> bool {
        matches!(
            self,
            Self::Authentication | Self::RateLimited { .. } | Self::Store(_)
        )
    }

    /// Whether the condition is a pre-scan configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownOwner { .. } | Self::UnknownRepository { .. }
        )
    }
}

/// An error surfaced while assembling one pull request.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error(transparent)]
    Remote(#[from] GitHubError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What to do with the in-flight pull request after a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemDisposition {
    /// Drop this pull request from the run and continue the scan. It will be
    /// retried on a later run while its update instant stays at or after
    /// that run's cursor; no separate retry marker is kept.
    Skip,
    /// Stop the scan and surface the failure.
    AbortRun,
}

/// Classify a remote failure raised while assembling a specific pull request.
///
/// Server-side errors poison only the offending item. Everything else,
/// including rate limiting, aborts: continuing to hammer a throttled or
/// misbehaving API would burn the remaining budget for nothing.
pub fn classify(e: &GitHubError) -> ItemDisposition {
    match e {
        GitHubError::Server { .. } => ItemDisposition::Skip,
        _ => ItemDisposition::AbortRun,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_skip_the_item() {
        let e = GitHubError::Server { status: 500 };
        assert_eq!(classify(&e), ItemDisposition::Skip);
        let e = GitHubError::Server { status: 503 };
        assert_eq!(classify(&e), ItemDisposition::Skip);
    }

    #[test]
    fn rate_limit_and_auth_abort_the_run() {
        let rate_limited = GitHubError::RateLimited { reset_at: None };
        assert_eq!(classify(&rate_limited), ItemDisposition::AbortRun);

        let auth = GitHubError::AuthRequired;
        assert_eq!(classify(&auth), ItemDisposition::AbortRun);
    }

    #[test]
    fn rate_limit_maps_to_a_distinct_variant() {
        let err = SyncError::from_remote(GitHubError::RateLimited { reset_at: None });
        assert!(matches!(err, SyncError::RateLimited { .. }));
        assert!(err.aborts_run());

        let err = SyncError::from_remote(GitHubError::AuthRequired);
        assert!(matches!(err, SyncError::Authentication));
        assert!(err.aborts_run());
    }

    #[test]
    fn configuration_errors_do_not_count_as_run_aborts() {
        let err = SyncError::UnknownOwner {
            owner: "ghost".to_string(),
        };
        assert!(err.is_configuration());
        assert!(!err.aborts_run());

        let err = SyncError::UnknownRepository {
            owner: "octo-org".to_string(),
            name: "missing".to_string(),
        };
        assert!(err.is_configuration());
    }
}
