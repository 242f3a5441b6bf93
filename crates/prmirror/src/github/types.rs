//! Wire records deserialized from the GitHub REST API.
//!
//! Timestamps arrive as RFC 3339 strings and are deserialized into
//! `DateTime<Utc>`; [`naive`] converts them to the timezone-naive instants
//! the store compares and persists, so both representations collapse into
//! one before any marker comparison happens.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Normalize a remote timestamp to the store's naive representation.
pub fn naive(ts: DateTime<Utc>) -> NaiveDateTime {
    ts.naive_utc()
}

/// Normalize an optional remote timestamp.
pub fn naive_opt(ts: Option<DateTime<Utc>>) -> Option<NaiveDateTime> {
    ts.map(naive)
}

/// A reference to an account embedded in another record.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub login: String,
    pub avatar_url: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

/// An account looked up directly.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRecord {
    pub login: String,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

/// A repository as listed by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoRecord {
    pub name: String,
    pub full_name: Option<String>,
    pub html_url: Option<String>,
    pub owner: Option<UserRef>,
}

/// Marker sub-resource present on issues that are pull requests.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestLink {
    pub url: Option<String>,
}

/// An issue as returned by the issues listing.
///
/// Pull requests are a subset of issues on this platform; the
/// `pull_request` link distinguishes them. Plain issues pass through the
/// stream and are skipped by the assembler.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRecord {
    pub number: i64,
    pub updated_at: DateTime<Utc>,
    pub pull_request: Option<PullRequestLink>,
}

impl IssueRecord {
    /// The issue-side update instant, normalized.
    pub fn updated_at_naive(&self) -> NaiveDateTime {
        naive(self.updated_at)
    }

    /// Whether this issue links to a pull-request sub-resource.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// A pull request fetched through its own endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRecord {
    pub id: i64,
    pub number: i64,
    pub title: Option<String>,
    pub body: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged: bool,
    pub mergeable_state: Option<String>,
    pub merge_commit_sha: Option<String>,
    pub additions: Option<i32>,
    pub deletions: Option<i32>,
    pub changed_files: Option<i32>,
    pub user: Option<UserRef>,
    pub assignee: Option<UserRef>,
    pub merged_by: Option<UserRef>,
}

/// An issue comment on a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRecord {
    pub body: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: Option<UserRef>,
}

/// An inline review comment on a pull request's diff.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCommentRecord {
    pub body: Option<String>,
    pub url: Option<String>,
    pub commit_id: String,
    pub original_commit_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: Option<UserRef>,
}

/// Git identity embedded in commit metadata.
///
/// Distinct from an account: these are whatever name/email the committer had
/// configured, and they are the enrichment source for sparse profiles.
#[derive(Debug, Clone, Deserialize)]
pub struct GitIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Git metadata of a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    pub author: Option<GitIdentity>,
    pub committer: Option<GitIdentity>,
}

/// A commit belonging to a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub author: Option<UserRef>,
    pub committer: Option<UserRef>,
    pub commit: GitCommit,
}

/// A label referenced by a labeled/unlabeled event.
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

/// An issue lifecycle event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub event: String,
    pub created_at: DateTime<Utc>,
    pub commit_id: Option<String>,
    pub actor: Option<UserRef>,
    pub label: Option<Label>,
}
