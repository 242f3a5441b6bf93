//! Integration tests for natural-key resolution across entity kinds.
//!
//! These run against an in-memory SQLite database with migrations applied
//! and exercise the resolver contracts the scan engine depends on: composite
//! natural keys deduplicate, version markers never regress, and kinds
//! without a marker only write when enrichment actually changes something.

use chrono::{NaiveDate, NaiveDateTime};
use prmirror::connect_and_migrate;
use prmirror::entity::prelude::*;
use prmirror::store::observations::{
    CommentObservation, CommitObservation, EventObservation, PullRequestObservation,
    RepositoryObservation, UserObservation,
};
use prmirror::store::{resolve_or_create, ResolveOutcome};
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

fn ts(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .expect("valid date")
        .and_hms_opt(hour, 0, 0)
        .expect("valid time")
}

async fn setup_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory database should migrate")
}

async fn seed_repository(db: &DatabaseConnection) -> Uuid {
    resolve_or_create(
        db,
        RepositoryObservation {
            owner: "octo-org".to_string(),
            name: "widgets".to_string(),
            display_name: Some("widgets".to_string()),
            url: Some("https://github.com/octo-org/widgets".to_string()),
        },
    )
    .await
    .expect("repository should resolve")
    .model
    .id
}

async fn seed_user(db: &DatabaseConnection, login: &str) -> Uuid {
    resolve_or_create(
        db,
        UserObservation {
            login: login.to_string(),
            ..UserObservation::default()
        },
    )
    .await
    .expect("user should resolve")
    .model
    .id
}

fn observed_pr(
    repository_id: Uuid,
    github_id: i64,
    updated_at: NaiveDateTime,
    title: &str,
) -> PullRequestObservation {
    PullRequestObservation {
        github_id,
        repository_id,
        number: github_id - 1000,
        created_at: ts(1, 0),
        updated_at,
        title: Some(title.to_string()),
        body: None,
        state: Some("open".to_string()),
        closed_at: None,
        merged_at: None,
        merged: false,
        mergeable_state: None,
        merge_commit_sha: None,
        additions: None,
        deletions: None,
        changed_files: None,
        author_id: None,
        assignee_id: None,
        merged_by_id: None,
    }
}

async fn seed_pull_request(db: &DatabaseConnection, repository_id: Uuid) -> Uuid {
    resolve_or_create(db, observed_pr(repository_id, 1001, ts(2, 0), "initial"))
        .await
        .expect("pull request should resolve")
        .model
        .id
}

#[tokio::test]
async fn pull_request_marker_never_regresses() {
    let db = setup_db().await;
    let repository_id = seed_repository(&db).await;

    let first = resolve_or_create(&db, observed_pr(repository_id, 1001, ts(3, 12), "initial"))
        .await
        .expect("create");
    assert_eq!(first.outcome, ResolveOutcome::Created);

    // An older observation must not overwrite anything.
    let stale = resolve_or_create(&db, observed_pr(repository_id, 1001, ts(2, 0), "stale title"))
        .await
        .expect("stale resolve");
    assert_eq!(stale.outcome, ResolveOutcome::Unchanged);
    assert_eq!(stale.model.title.as_deref(), Some("initial"));

    // An equal marker is also a no-op: re-fetching the inclusive cursor
    // boundary must be write-free.
    let equal = resolve_or_create(&db, observed_pr(repository_id, 1001, ts(3, 12), "other"))
        .await
        .expect("equal resolve");
    assert_eq!(equal.outcome, ResolveOutcome::Unchanged);

    // A newer one refreshes the mutable fields.
    let newer = resolve_or_create(&db, observed_pr(repository_id, 1001, ts(4, 0), "renamed"))
        .await
        .expect("newer resolve");
    assert_eq!(newer.outcome, ResolveOutcome::Updated);
    assert_eq!(newer.model.title.as_deref(), Some("renamed"));
    assert_eq!(newer.model.updated_at, ts(4, 0));
}

#[tokio::test]
async fn pull_request_immutable_fields_are_seeded_once() {
    let db = setup_db().await;
    let repository_id = seed_repository(&db).await;

    let first = resolve_or_create(&db, observed_pr(repository_id, 1001, ts(2, 0), "initial"))
        .await
        .expect("create");

    let mut later = observed_pr(repository_id, 1001, ts(5, 0), "renamed");
    later.created_at = ts(4, 23);
    later.number = 999;
    let updated = resolve_or_create(&db, later).await.expect("update");

    assert_eq!(updated.outcome, ResolveOutcome::Updated);
    assert_eq!(updated.model.created_at, first.model.created_at);
    assert_eq!(updated.model.number, first.model.number);
}

#[tokio::test]
async fn comment_composite_key_deduplicates() {
    let db = setup_db().await;
    let repository_id = seed_repository(&db).await;
    let pull_request_id = seed_pull_request(&db, repository_id).await;
    let user_id = seed_user(&db, "octocat").await;

    let observed = CommentObservation {
        pull_request_id,
        user_id: Some(user_id),
        created_at: ts(2, 10),
        body: Some("looks good".to_string()),
        url: None,
        updated_at: ts(2, 10),
    };

    let first = resolve_or_create(&db, observed.clone()).await.expect("create");
    assert_eq!(first.outcome, ResolveOutcome::Created);

    let second = resolve_or_create(&db, observed.clone()).await.expect("re-resolve");
    assert_eq!(second.outcome, ResolveOutcome::Unchanged);

    // A later edit bumps the marker and rewrites the body.
    let mut edited = observed.clone();
    edited.body = Some("looks great".to_string());
    edited.updated_at = ts(2, 11);
    let third = resolve_or_create(&db, edited).await.expect("edit");
    assert_eq!(third.outcome, ResolveOutcome::Updated);

    // A different creation instant is a different comment.
    let mut other = observed;
    other.created_at = ts(2, 12);
    other.updated_at = ts(2, 12);
    let fourth = resolve_or_create(&db, other).await.expect("other comment");
    assert_eq!(fourth.outcome, ResolveOutcome::Created);

    let rows = Comment::find().all(&db).await.expect("query");
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn comment_key_handles_deleted_accounts() {
    let db = setup_db().await;
    let repository_id = seed_repository(&db).await;
    let pull_request_id = seed_pull_request(&db, repository_id).await;

    let ghost_comment = CommentObservation {
        pull_request_id,
        user_id: None,
        created_at: ts(2, 10),
        body: Some("posted before the account vanished".to_string()),
        url: None,
        updated_at: ts(2, 10),
    };

    let first = resolve_or_create(&db, ghost_comment.clone())
        .await
        .expect("create");
    assert_eq!(first.outcome, ResolveOutcome::Created);

    let second = resolve_or_create(&db, ghost_comment).await.expect("re-resolve");
    assert_eq!(second.outcome, ResolveOutcome::Unchanged);
    assert_eq!(second.model.id, first.model.id);
}

#[tokio::test]
async fn commit_enrichment_writes_only_on_change() {
    let db = setup_db().await;
    let repository_id = seed_repository(&db).await;
    let pull_request_id = seed_pull_request(&db, repository_id).await;
    let author_id = seed_user(&db, "octocat").await;

    let bare = CommitObservation {
        pull_request_id,
        sha: "abc123".to_string(),
        author_id: None,
        committer_id: None,
        author_date: None,
        commit_date: None,
    };
    let first = resolve_or_create(&db, bare.clone()).await.expect("create");
    assert_eq!(first.outcome, ResolveOutcome::Created);

    // Re-observing with no new information is a no-op.
    let second = resolve_or_create(&db, bare).await.expect("re-resolve");
    assert_eq!(second.outcome, ResolveOutcome::Unchanged);

    // Learning the author is an enrichment write.
    let enriched = CommitObservation {
        pull_request_id,
        sha: "abc123".to_string(),
        author_id: Some(author_id),
        committer_id: None,
        author_date: Some(ts(2, 9)),
        commit_date: Some(ts(2, 9)),
    };
    let third = resolve_or_create(&db, enriched.clone()).await.expect("enrich");
    assert_eq!(third.outcome, ResolveOutcome::Updated);

    // And replaying the same enrichment is a no-op again.
    let fourth = resolve_or_create(&db, enriched).await.expect("replay");
    assert_eq!(fourth.outcome, ResolveOutcome::Unchanged);

    let rows = Commit::find().all(&db).await.expect("query");
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn event_is_unique_by_remote_id() {
    let db = setup_db().await;
    let repository_id = seed_repository(&db).await;
    let pull_request_id = seed_pull_request(&db, repository_id).await;

    let observed = EventObservation {
        github_id: 9001,
        pull_request_id,
        kind: "labeled".to_string(),
        created_at: ts(2, 10),
        commit_sha: None,
        actor_id: None,
        extra: Some("bug".to_string()),
    };

    let first = resolve_or_create(&db, observed.clone()).await.expect("create");
    assert_eq!(first.outcome, ResolveOutcome::Created);
    assert_eq!(first.model.extra.as_deref(), Some("bug"));

    let second = resolve_or_create(&db, observed).await.expect("re-resolve");
    assert_eq!(second.outcome, ResolveOutcome::Unchanged);

    let rows = Event::find().all(&db).await.expect("query");
    assert_eq!(rows.len(), 1);
}
