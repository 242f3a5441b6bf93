//! Octocrab-backed implementation of [`ActivitySource`].
//!
//! Uses raw REST routes throughout: the listing endpoints this system needs
//! (issues sorted by update time with a `since` cursor, per-pull-request
//! comment/commit/event collections) are simpler to drive as routes than
//! through the typed builders, and keep the deserialization target under
//! our control.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;

use super::error::{map_remote_error, status_of, GitHubError};
use super::source::{ActivitySource, PAGE_SIZE};
use super::types::{
    AccountRecord, CommentRecord, CommitRecord, EventRecord, IssueRecord, PullRequestRecord,
    RepoRecord, ReviewCommentRecord,
};

/// GitHub client implementing the [`ActivitySource`] seam.
pub struct GitHubSource {
    inner: Octocrab,
}

impl GitHubSource {
    /// Create a source from an optional personal access token.
    ///
    /// Without a token, requests run unauthenticated against the public API
    /// (with its much lower rate-limit budget).
    pub fn new(token: Option<&str>) -> Result<Self, GitHubError> {
        let builder = Octocrab::builder();
        let inner = match token {
            Some(token) => builder.personal_token(token.to_string()).build()?,
            None => builder.build()?,
        };
        Ok(Self { inner })
    }

    async fn get<T: DeserializeOwned>(&self, route: &str) -> Result<T, GitHubError> {
        self.inner
            .get(route, None::<&()>)
            .await
            .map_err(map_remote_error)
    }

    /// GET a resource, mapping 404 to `None`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        route: &str,
    ) -> Result<Option<T>, GitHubError> {
        match self.inner.get(route, None::<&()>).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if status_of(&e) == Some(404) => Ok(None),
            Err(e) => Err(map_remote_error(e)),
        }
    }

    /// Drain a paginated listing route into one collection.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        route: &str,
    ) -> Result<Vec<T>, GitHubError> {
        let mut all = Vec::new();
        let mut page = 1u32;

        loop {
            let separator = if route.contains('?') { '&' } else { '?' };
            let paged = format!("{route}{separator}per_page={PAGE_SIZE}&page={page}");
            let items: Vec<T> = self.get(&paged).await?;
            let count = items.len();
            all.extend(items);

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(all)
    }
}

/// Format a naive cursor the way the API expects (`since` is UTC).
fn format_since(since: NaiveDateTime) -> String {
    since.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[async_trait]
impl ActivitySource for GitHubSource {
    async fn find_account(&self, owner: &str) -> Result<Option<AccountRecord>, GitHubError> {
        self.get_optional(&format!("/users/{owner}")).await
    }

    async fn list_repositories(&self, owner: &str) -> Result<Vec<RepoRecord>, GitHubError> {
        self.get_all_pages(&format!("/users/{owner}/repos")).await
    }

    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<RepoRecord>, GitHubError> {
        self.get_optional(&format!("/repos/{owner}/{name}")).await
    }

    async fn list_issues_page(
        &self,
        owner: &str,
        name: &str,
        since: Option<NaiveDateTime>,
        newest: bool,
        page: u32,
    ) -> Result<Vec<IssueRecord>, GitHubError> {
        let direction = if newest { "desc" } else { "asc" };
        let mut route = format!(
            "/repos/{owner}/{name}/issues?state=all&sort=updated&direction={direction}\
             &per_page={PAGE_SIZE}&page={page}"
        );
        if let Some(since) = since {
            route.push_str(&format!("&since={}", format_since(since)));
        }
        self.get(&route).await
    }

    async fn get_pull_request(
        &self,
        owner: &str,
        name: &str,
        number: i64,
    ) -> Result<Option<PullRequestRecord>, GitHubError> {
        self.get_optional(&format!("/repos/{owner}/{name}/pulls/{number}"))
            .await
    }

    async fn list_issue_comments(
        &self,
        owner: &str,
        name: &str,
        number: i64,
    ) -> Result<Vec<CommentRecord>, GitHubError> {
        self.get_all_pages(&format!("/repos/{owner}/{name}/issues/{number}/comments"))
            .await
    }

    async fn list_review_comments(
        &self,
        owner: &str,
        name: &str,
        number: i64,
    ) -> Result<Vec<ReviewCommentRecord>, GitHubError> {
        self.get_all_pages(&format!("/repos/{owner}/{name}/pulls/{number}/comments"))
            .await
    }

    async fn list_commits(
        &self,
        owner: &str,
        name: &str,
        number: i64,
    ) -> Result<Vec<CommitRecord>, GitHubError> {
        self.get_all_pages(&format!("/repos/{owner}/{name}/pulls/{number}/commits"))
            .await
    }

    async fn list_issue_events(
        &self,
        owner: &str,
        name: &str,
        number: i64,
    ) -> Result<Vec<EventRecord>, GitHubError> {
        self.get_all_pages(&format!("/repos/{owner}/{name}/issues/{number}/events"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn format_since_renders_utc_suffix() {
        let since = NaiveDate::from_ymd_opt(2025, 3, 4)
            .expect("valid date")
            .and_hms_opt(12, 30, 5)
            .expect("valid time");
        assert_eq!(format_since(since), "2025-03-04T12:30:05Z");
    }

    #[tokio::test]
    async fn source_builds_without_token() {
        let source = GitHubSource::new(None);
        assert!(source.is_ok());
    }
}
