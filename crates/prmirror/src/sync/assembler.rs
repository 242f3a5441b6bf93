//! Pull-request assembly.
//!
//! Turns one issue record into a fully populated pull-request aggregate:
//! metadata, participants, comments, review comments, commits, and lifecycle
//! events, every nested entity resolved through the store so re-observation
//! never duplicates rows.

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::github::types::{naive, naive_opt, IssueRecord};
use crate::github::ActivitySource;
use crate::store::observations::{
    CommentObservation, CommitObservation, EventObservation, PullRequestObservation,
    ReviewCommentObservation,
};
use crate::store::{resolve_or_create, ResolveOutcome};

use super::error::AssembleError;
use super::identity::IdentityCache;

/// Summary of one assembled pull-request aggregate.
#[derive(Debug, Clone)]
pub struct AssembledPullRequest {
    pub github_id: i64,
    pub number: i64,
    /// What the resolver did with the pull request itself.
    pub outcome: ResolveOutcome,
    pub comments: usize,
    pub review_comments: usize,
    pub commits: usize,
    pub events: usize,
}

/// Assemble the pull request behind an issue record.
///
/// Returns `None` for plain issues (no pull-request sub-resource) and for
/// issues whose sub-resource has vanished remotely.
///
/// The version check deliberately uses the *issue's* `updated_at` rather
/// than the pull-request object's own: the two drift independently, and only
/// the issue's is consistently bumped by label and assignment changes. When
/// the marker is unchanged the resolver leaves every stored field alone;
/// immutable fields (`number`, `created_at`) are seeded once at creation.
pub async fn assemble<C, S>(
    db: &C,
    source: &S,
    identities: &mut IdentityCache,
    repository_id: Uuid,
    owner: &str,
    name: &str,
    issue: &IssueRecord,
) -> Result<Option<AssembledPullRequest>, AssembleError>
where
    C: ConnectionTrait,
    S: ActivitySource,
{
    if !issue.is_pull_request() {
        return Ok(None);
    }

    let Some(record) = source.get_pull_request(owner, name, issue.number).await? else {
        return Ok(None);
    };

    let author = identities.resolve(db, record.user.as_ref()).await?;
    let assignee = identities.resolve(db, record.assignee.as_ref()).await?;
    let merged_by = identities.resolve(db, record.merged_by.as_ref()).await?;

    // Merge statistics are only populated by the API post-merge; recording
    // them for an unmerged pull request would persist placeholder zeros.
    let (merge_commit_sha, additions, deletions, changed_files) = if record.merged {
        (
            record.merge_commit_sha.clone(),
            record.additions,
            record.deletions,
            record.changed_files,
        )
    } else {
        (None, None, None, None)
    };

    let pull_request = resolve_or_create(
        db,
        PullRequestObservation {
            github_id: record.id,
            repository_id,
            number: record.number,
            created_at: naive(record.created_at),
            updated_at: issue.updated_at_naive(),
            title: record.title.clone(),
            body: record.body.clone(),
            state: record.state.clone(),
            closed_at: naive_opt(record.closed_at),
            merged_at: naive_opt(record.merged_at),
            merged: record.merged,
            mergeable_state: record.mergeable_state.clone(),
            merge_commit_sha,
            additions,
            deletions,
            changed_files,
            author_id: author.map(|u| u.id),
            assignee_id: assignee.map(|u| u.id),
            merged_by_id: merged_by.map(|u| u.id),
        },
    )
    .await?;
    let pull_request_id = pull_request.model.id;

    let mut summary = AssembledPullRequest {
        github_id: record.id,
        number: record.number,
        outcome: pull_request.outcome,
        comments: 0,
        review_comments: 0,
        commits: 0,
        events: 0,
    };

    for comment in source.list_issue_comments(owner, name, record.number).await? {
        let user = identities.resolve(db, comment.user.as_ref()).await?;
        resolve_or_create(
            db,
            CommentObservation {
                pull_request_id,
                user_id: user.map(|u| u.id),
                created_at: naive(comment.created_at),
                body: comment.body.clone(),
                url: comment.url.clone(),
                updated_at: naive(comment.updated_at),
            },
        )
        .await?;
        summary.comments += 1;
    }

    for review in source
        .list_review_comments(owner, name, record.number)
        .await?
    {
        let user = identities.resolve(db, review.user.as_ref()).await?;
        resolve_or_create(
            db,
            ReviewCommentObservation {
                pull_request_id,
                commit_sha: review.commit_id.clone(),
                user_id: user.map(|u| u.id),
                created_at: naive(review.created_at),
                body: review.body.clone(),
                url: review.url.clone(),
                updated_at: naive(review.updated_at),
                original_commit_sha: review.original_commit_id.clone(),
            },
        )
        .await?;
        summary.review_comments += 1;
    }

    for commit in source.list_commits(owner, name, record.number).await? {
        let author = identities.resolve(db, commit.author.as_ref()).await?;
        let committer = identities.resolve(db, commit.committer.as_ref()).await?;

        // The git identity embedded in the commit is the only place display
        // names and emails reliably appear; back-fill the linked accounts.
        if let (Some(author), Some(git)) = (&author, commit.commit.author.as_ref()) {
            identities
                .enrich(db, &author.login, git.name.as_deref(), git.email.as_deref())
                .await?;
        }
        if let (Some(committer), Some(git)) = (&committer, commit.commit.committer.as_ref()) {
            identities
                .enrich(
                    db,
                    &committer.login,
                    git.name.as_deref(),
                    git.email.as_deref(),
                )
                .await?;
        }

        resolve_or_create(
            db,
            CommitObservation {
                pull_request_id,
                sha: commit.sha.clone(),
                author_id: author.map(|u| u.id),
                committer_id: committer.map(|u| u.id),
                author_date: commit.commit.author.as_ref().and_then(|g| naive_opt(g.date)),
                commit_date: commit
                    .commit
                    .committer
                    .as_ref()
                    .and_then(|g| naive_opt(g.date)),
            },
        )
        .await?;
        summary.commits += 1;
    }

    for event in source.list_issue_events(owner, name, record.number).await? {
        let actor = identities.resolve(db, event.actor.as_ref()).await?;
        let extra = match event.event.as_str() {
            "labeled" | "unlabeled" => event.label.as_ref().map(|l| l.name.clone()),
            _ => None,
        };
        resolve_or_create(
            db,
            EventObservation {
                github_id: event.id,
                pull_request_id,
                kind: event.event.clone(),
                created_at: naive(event.created_at),
                commit_sha: event.commit_id.clone(),
                actor_id: actor.map(|u| u.id),
                extra,
            },
        )
        .await?;
        summary.events += 1;
    }

    Ok(Some(summary))
}
