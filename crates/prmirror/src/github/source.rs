//! The remote collaborator seam.
//!
//! [`ActivitySource`] is the capability surface the scan engine consumes.
//! The production implementation is [`super::client::GitHubSource`]; tests
//! substitute in-memory fakes.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::error::GitHubError;
use super::types::{
    AccountRecord, CommentRecord, CommitRecord, EventRecord, IssueRecord, PullRequestRecord,
    RepoRecord, ReviewCommentRecord,
};

/// Number of records requested per page. A shorter page terminates a listing.
pub const PAGE_SIZE: usize = 100;

/// Capabilities of the remote repository-hosting platform.
///
/// All listing methods return complete collections except
/// [`list_issues_page`](ActivitySource::list_issues_page), which is paginated
/// so [`super::stream::IssueStream`] can interleave fetching with
/// checkpointed persistence instead of buffering a whole repository.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Look up an account by login. `None` means the owner does not exist.
    async fn find_account(&self, owner: &str) -> Result<Option<AccountRecord>, GitHubError>;

    /// List all repositories owned by an account.
    async fn list_repositories(&self, owner: &str) -> Result<Vec<RepoRecord>, GitHubError>;

    /// Look up a single repository. `None` means it does not exist.
    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<RepoRecord>, GitHubError>;

    /// Fetch one page of issues, state "all", sorted by update time.
    ///
    /// `since` bounds the listing to issues updated at or after the cursor;
    /// `newest` flips the sort to descending. Pages are 1-indexed and hold
    /// at most [`PAGE_SIZE`] records.
    async fn list_issues_page(
        &self,
        owner: &str,
        name: &str,
        since: Option<NaiveDateTime>,
        newest: bool,
        page: u32,
    ) -> Result<Vec<IssueRecord>, GitHubError>;

    /// Fetch the pull-request record behind an issue. `None` means the
    /// sub-resource is gone (e.g. deleted head repository).
    async fn get_pull_request(
        &self,
        owner: &str,
        name: &str,
        number: i64,
    ) -> Result<Option<PullRequestRecord>, GitHubError>;

    /// List all issue comments on a pull request.
    async fn list_issue_comments(
        &self,
        owner: &str,
        name: &str,
        number: i64,
    ) -> Result<Vec<CommentRecord>, GitHubError>;

    /// List all review comments on a pull request.
    async fn list_review_comments(
        &self,
        owner: &str,
        name: &str,
        number: i64,
    ) -> Result<Vec<ReviewCommentRecord>, GitHubError>;

    /// List all commits of a pull request.
    async fn list_commits(
        &self,
        owner: &str,
        name: &str,
        number: i64,
    ) -> Result<Vec<CommitRecord>, GitHubError>;

    /// List all lifecycle events of the issue behind a pull request.
    async fn list_issue_events(
        &self,
        owner: &str,
        name: &str,
        number: i64,
    ) -> Result<Vec<EventRecord>, GitHubError>;
}
