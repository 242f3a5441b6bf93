//! Per-kind [`Observation`] implementations.
//!
//! Each struct carries one observed instance of an entity: the natural key,
//! the resolved foreign keys, and the observed field values. The update
//! policies encode which fields are mutable for the kind; immutable fields
//! (a pull request's `number` and `created_at`, a commit's `sha`) are seeded
//! at insertion and never touched again.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::{comment, commit, event, pull_request, repository, review_comment, user};

use super::errors::Result;
use super::resolver::Observation;

/// An observed repository. Natural key: `(owner, name)`.
#[derive(Debug, Clone)]
pub struct RepositoryObservation {
    pub owner: String,
    pub name: String,
    pub display_name: Option<String>,
    pub url: Option<String>,
}

#[async_trait]
impl Observation for RepositoryObservation {
    type Model = repository::Model;

    async fn find_existing<C: ConnectionTrait>(&self, db: &C) -> Result<Option<Self::Model>> {
        super::queries::find_repository(db, &self.owner, &self.name).await
    }

    async fn insert<C: ConnectionTrait>(&self, db: &C) -> Result<Self::Model> {
        let model = repository::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner: Set(self.owner.clone()),
            name: Set(self.name.clone()),
            display_name: Set(self.display_name.clone()),
            url: Set(self.url.clone()),
        };
        Ok(model.insert(db).await?)
    }

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        existing: Self::Model,
    ) -> Result<Option<Self::Model>> {
        let mut active: repository::ActiveModel = existing.clone().into();
        let mut changed = false;

        if self.display_name.is_some() && self.display_name != existing.display_name {
            active.display_name = Set(self.display_name.clone());
            changed = true;
        }
        if self.url.is_some() && self.url != existing.url {
            active.url = Set(self.url.clone());
            changed = true;
        }

        if !changed {
            return Ok(None);
        }
        Ok(Some(active.update(db).await?))
    }
}

/// An observed account. Natural key: `login`.
///
/// Only `name` and `email` are mutable, and only by enrichment: a later
/// observation fills them in when it knows more than the stored row.
#[derive(Debug, Clone, Default)]
pub struct UserObservation {
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub url: Option<String>,
    pub account_type: Option<String>,
}

#[async_trait]
impl Observation for UserObservation {
    type Model = user::Model;

    async fn find_existing<C: ConnectionTrait>(&self, db: &C) -> Result<Option<Self::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Login.eq(&self.login))
            .one(db)
            .await?)
    }

    async fn insert<C: ConnectionTrait>(&self, db: &C) -> Result<Self::Model> {
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            login: Set(self.login.clone()),
            name: Set(self.name.clone()),
            email: Set(self.email.clone()),
            avatar_url: Set(self.avatar_url.clone()),
            url: Set(self.url.clone()),
            account_type: Set(self.account_type.clone()),
        };
        Ok(model.insert(db).await?)
    }

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        existing: Self::Model,
    ) -> Result<Option<Self::Model>> {
        let mut active: user::ActiveModel = existing.clone().into();
        let mut changed = false;

        if self.name.is_some() && self.name != existing.name {
            active.name = Set(self.name.clone());
            changed = true;
        }
        if self.email.is_some() && self.email != existing.email {
            active.email = Set(self.email.clone());
            changed = true;
        }

        if !changed {
            return Ok(None);
        }
        Ok(Some(active.update(db).await?))
    }
}

/// An observed pull request. Natural key: `github_id`.
///
/// `updated_at` is the *issue* object's update instant, which is the one
/// reliably bumped by label and assignment changes; it serves as the
/// version marker.
#[derive(Debug, Clone)]
pub struct PullRequestObservation {
    pub github_id: i64,
    pub repository_id: Uuid,
    pub number: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub title: Option<String>,
    pub body: Option<String>,
    pub state: Option<String>,
    pub closed_at: Option<NaiveDateTime>,
    pub merged_at: Option<NaiveDateTime>,
    pub merged: bool,
    pub mergeable_state: Option<String>,
    pub merge_commit_sha: Option<String>,
    pub additions: Option<i32>,
    pub deletions: Option<i32>,
    pub changed_files: Option<i32>,
    pub author_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub merged_by_id: Option<Uuid>,
}

#[async_trait]
impl Observation for PullRequestObservation {
    type Model = pull_request::Model;

    async fn find_existing<C: ConnectionTrait>(&self, db: &C) -> Result<Option<Self::Model>> {
        Ok(pull_request::Entity::find()
            .filter(pull_request::Column::GithubId.eq(self.github_id))
            .one(db)
            .await?)
    }

    fn observed_marker(&self) -> Option<NaiveDateTime> {
        Some(self.updated_at)
    }

    fn stored_marker(model: &Self::Model) -> Option<NaiveDateTime> {
        Some(model.updated_at)
    }

    async fn insert<C: ConnectionTrait>(&self, db: &C) -> Result<Self::Model> {
        let model = pull_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            github_id: Set(self.github_id),
            number: Set(self.number),
            repository_id: Set(self.repository_id),
            title: Set(self.title.clone()),
            body: Set(self.body.clone()),
            state: Set(self.state.clone()),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
            closed_at: Set(self.closed_at),
            merged_at: Set(self.merged_at),
            merged: Set(self.merged),
            mergeable_state: Set(self.mergeable_state.clone()),
            merge_commit_sha: Set(self.merge_commit_sha.clone()),
            additions: Set(self.additions),
            deletions: Set(self.deletions),
            changed_files: Set(self.changed_files),
            author_id: Set(self.author_id),
            assignee_id: Set(self.assignee_id),
            merged_by_id: Set(self.merged_by_id),
        };
        Ok(model.insert(db).await?)
    }

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        existing: Self::Model,
    ) -> Result<Option<Self::Model>> {
        // number and created_at were seeded at creation and stay untouched.
        let mut active: pull_request::ActiveModel = existing.into();
        active.title = Set(self.title.clone());
        active.body = Set(self.body.clone());
        active.state = Set(self.state.clone());
        active.updated_at = Set(self.updated_at);
        active.closed_at = Set(self.closed_at);
        active.merged_at = Set(self.merged_at);
        active.merged = Set(self.merged);
        active.mergeable_state = Set(self.mergeable_state.clone());
        active.merge_commit_sha = Set(self.merge_commit_sha.clone());
        active.additions = Set(self.additions);
        active.deletions = Set(self.deletions);
        active.changed_files = Set(self.changed_files);
        active.author_id = Set(self.author_id);
        active.assignee_id = Set(self.assignee_id);
        active.merged_by_id = Set(self.merged_by_id);
        Ok(Some(active.update(db).await?))
    }
}

/// An observed issue comment. Natural key:
/// `(pull_request_id, user_id, created_at)`.
#[derive(Debug, Clone)]
pub struct CommentObservation {
    pub pull_request_id: Uuid,
    pub user_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub body: Option<String>,
    pub url: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[async_trait]
impl Observation for CommentObservation {
    type Model = comment::Model;

    async fn find_existing<C: ConnectionTrait>(&self, db: &C) -> Result<Option<Self::Model>> {
        let mut query = comment::Entity::find()
            .filter(comment::Column::PullRequestId.eq(self.pull_request_id))
            .filter(comment::Column::CreatedAt.eq(self.created_at));
        query = match self.user_id {
            Some(user_id) => query.filter(comment::Column::UserId.eq(user_id)),
            None => query.filter(comment::Column::UserId.is_null()),
        };
        Ok(query.one(db).await?)
    }

    fn observed_marker(&self) -> Option<NaiveDateTime> {
        Some(self.updated_at)
    }

    fn stored_marker(model: &Self::Model) -> Option<NaiveDateTime> {
        Some(model.updated_at)
    }

    async fn insert<C: ConnectionTrait>(&self, db: &C) -> Result<Self::Model> {
        let model = comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            pull_request_id: Set(self.pull_request_id),
            user_id: Set(self.user_id),
            created_at: Set(self.created_at),
            body: Set(self.body.clone()),
            url: Set(self.url.clone()),
            updated_at: Set(self.updated_at),
        };
        Ok(model.insert(db).await?)
    }

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        existing: Self::Model,
    ) -> Result<Option<Self::Model>> {
        let mut active: comment::ActiveModel = existing.into();
        active.body = Set(self.body.clone());
        active.url = Set(self.url.clone());
        active.updated_at = Set(self.updated_at);
        Ok(Some(active.update(db).await?))
    }
}

/// An observed review comment. Natural key:
/// `(pull_request_id, commit_sha, user_id, created_at)`.
#[derive(Debug, Clone)]
pub struct ReviewCommentObservation {
    pub pull_request_id: Uuid,
    pub commit_sha: String,
    pub user_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub body: Option<String>,
    pub url: Option<String>,
    pub updated_at: NaiveDateTime,
    pub original_commit_sha: Option<String>,
}

#[async_trait]
impl Observation for ReviewCommentObservation {
    type Model = review_comment::Model;

    async fn find_existing<C: ConnectionTrait>(&self, db: &C) -> Result<Option<Self::Model>> {
        let mut query = review_comment::Entity::find()
            .filter(review_comment::Column::PullRequestId.eq(self.pull_request_id))
            .filter(review_comment::Column::CommitSha.eq(&self.commit_sha))
            .filter(review_comment::Column::CreatedAt.eq(self.created_at));
        query = match self.user_id {
            Some(user_id) => query.filter(review_comment::Column::UserId.eq(user_id)),
            None => query.filter(review_comment::Column::UserId.is_null()),
        };
        Ok(query.one(db).await?)
    }

    fn observed_marker(&self) -> Option<NaiveDateTime> {
        Some(self.updated_at)
    }

    fn stored_marker(model: &Self::Model) -> Option<NaiveDateTime> {
        Some(model.updated_at)
    }

    async fn insert<C: ConnectionTrait>(&self, db: &C) -> Result<Self::Model> {
        let model = review_comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            pull_request_id: Set(self.pull_request_id),
            commit_sha: Set(self.commit_sha.clone()),
            user_id: Set(self.user_id),
            created_at: Set(self.created_at),
            body: Set(self.body.clone()),
            url: Set(self.url.clone()),
            updated_at: Set(self.updated_at),
            original_commit_sha: Set(self.original_commit_sha.clone()),
        };
        Ok(model.insert(db).await?)
    }

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        existing: Self::Model,
    ) -> Result<Option<Self::Model>> {
        let mut active: review_comment::ActiveModel = existing.into();
        active.body = Set(self.body.clone());
        active.url = Set(self.url.clone());
        active.updated_at = Set(self.updated_at);
        active.original_commit_sha = Set(self.original_commit_sha.clone());
        Ok(Some(active.update(db).await?))
    }
}

/// An observed commit. Natural key: `(pull_request_id, sha)`.
///
/// Commits have no version marker; the linked identities and git dates are
/// enrichment-only and rewritten only when they actually differ.
#[derive(Debug, Clone)]
pub struct CommitObservation {
    pub pull_request_id: Uuid,
    pub sha: String,
    pub author_id: Option<Uuid>,
    pub committer_id: Option<Uuid>,
    pub author_date: Option<NaiveDateTime>,
    pub commit_date: Option<NaiveDateTime>,
}

#[async_trait]
impl Observation for CommitObservation {
    type Model = commit::Model;

    async fn find_existing<C: ConnectionTrait>(&self, db: &C) -> Result<Option<Self::Model>> {
        Ok(commit::Entity::find()
            .filter(commit::Column::PullRequestId.eq(self.pull_request_id))
            .filter(commit::Column::Sha.eq(&self.sha))
            .one(db)
            .await?)
    }

    async fn insert<C: ConnectionTrait>(&self, db: &C) -> Result<Self::Model> {
        let model = commit::ActiveModel {
            id: Set(Uuid::new_v4()),
            pull_request_id: Set(self.pull_request_id),
            sha: Set(self.sha.clone()),
            author_id: Set(self.author_id),
            committer_id: Set(self.committer_id),
            author_date: Set(self.author_date),
            commit_date: Set(self.commit_date),
        };
        Ok(model.insert(db).await?)
    }

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        existing: Self::Model,
    ) -> Result<Option<Self::Model>> {
        let mut active: commit::ActiveModel = existing.clone().into();
        let mut changed = false;

        if self.author_id.is_some() && self.author_id != existing.author_id {
            active.author_id = Set(self.author_id);
            changed = true;
        }
        if self.committer_id.is_some() && self.committer_id != existing.committer_id {
            active.committer_id = Set(self.committer_id);
            changed = true;
        }
        if self.author_date.is_some() && self.author_date != existing.author_date {
            active.author_date = Set(self.author_date);
            changed = true;
        }
        if self.commit_date.is_some() && self.commit_date != existing.commit_date {
            active.commit_date = Set(self.commit_date);
            changed = true;
        }

        if !changed {
            return Ok(None);
        }
        Ok(Some(active.update(db).await?))
    }
}

/// An observed lifecycle event. Natural key: the remote event id.
///
/// Events are immutable remotely; only the kind-specific payload fields are
/// refreshed, and only when they differ.
#[derive(Debug, Clone)]
pub struct EventObservation {
    pub github_id: i64,
    pub pull_request_id: Uuid,
    pub kind: String,
    pub created_at: NaiveDateTime,
    pub commit_sha: Option<String>,
    pub actor_id: Option<Uuid>,
    pub extra: Option<String>,
}

#[async_trait]
impl Observation for EventObservation {
    type Model = event::Model;

    async fn find_existing<C: ConnectionTrait>(&self, db: &C) -> Result<Option<Self::Model>> {
        Ok(event::Entity::find()
            .filter(event::Column::GithubId.eq(self.github_id))
            .one(db)
            .await?)
    }

    async fn insert<C: ConnectionTrait>(&self, db: &C) -> Result<Self::Model> {
        let model = event::ActiveModel {
            id: Set(Uuid::new_v4()),
            github_id: Set(self.github_id),
            pull_request_id: Set(self.pull_request_id),
            kind: Set(self.kind.clone()),
            created_at: Set(self.created_at),
            commit_sha: Set(self.commit_sha.clone()),
            actor_id: Set(self.actor_id),
            extra: Set(self.extra.clone()),
        };
        Ok(model.insert(db).await?)
    }

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        existing: Self::Model,
    ) -> Result<Option<Self::Model>> {
        let mut active: event::ActiveModel = existing.clone().into();
        let mut changed = false;

        if self.commit_sha.is_some() && self.commit_sha != existing.commit_sha {
            active.commit_sha = Set(self.commit_sha.clone());
            changed = true;
        }
        if self.actor_id.is_some() && self.actor_id != existing.actor_id {
            active.actor_id = Set(self.actor_id);
            changed = true;
        }
        if self.extra.is_some() && self.extra != existing.extra {
            active.extra = Set(self.extra.clone());
            changed = true;
        }

        if !changed {
            return Ok(None);
        }
        Ok(Some(active.update(db).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_and_migrate;
    use crate::store::resolver::{resolve_or_create, ResolveOutcome};

    fn observed_user(login: &str) -> UserObservation {
        UserObservation {
            login: login.to_string(),
            avatar_url: Some(format!("https://avatars.example.com/{login}")),
            url: Some(format!("https://api.example.com/users/{login}")),
            account_type: Some("User".to_string()),
            ..UserObservation::default()
        }
    }

    #[tokio::test]
    async fn user_is_created_once_and_short_circuits() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate");

        let first = resolve_or_create(&db, observed_user("octocat"))
            .await
            .expect("first resolve");
        assert_eq!(first.outcome, ResolveOutcome::Created);

        let second = resolve_or_create(&db, observed_user("octocat"))
            .await
            .expect("second resolve");
        assert_eq!(second.outcome, ResolveOutcome::Unchanged);
        assert_eq!(second.model.id, first.model.id);
    }

    #[tokio::test]
    async fn user_enrichment_writes_only_on_change() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate");

        resolve_or_create(&db, observed_user("octocat"))
            .await
            .expect("create");

        let mut enriched = observed_user("octocat");
        enriched.name = Some("The Octocat".to_string());
        enriched.email = Some("octocat@example.com".to_string());

        let updated = resolve_or_create(&db, enriched.clone())
            .await
            .expect("enrich");
        assert_eq!(updated.outcome, ResolveOutcome::Updated);
        assert_eq!(updated.model.name.as_deref(), Some("The Octocat"));

        // Re-observing the same enrichment is a no-op.
        let again = resolve_or_create(&db, enriched).await.expect("re-enrich");
        assert_eq!(again.outcome, ResolveOutcome::Unchanged);
    }

    #[tokio::test]
    async fn repository_natural_key_is_owner_and_name() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate");

        let obs = RepositoryObservation {
            owner: "octo-org".to_string(),
            name: "widgets".to_string(),
            display_name: Some("widgets".to_string()),
            url: Some("https://github.com/octo-org/widgets".to_string()),
        };
        let first = resolve_or_create(&db, obs.clone()).await.expect("create");
        assert_eq!(first.outcome, ResolveOutcome::Created);

        let same_name_other_owner = RepositoryObservation {
            owner: "someone-else".to_string(),
            ..obs.clone()
        };
        let other = resolve_or_create(&db, same_name_other_owner)
            .await
            .expect("create under other owner");
        assert_eq!(other.outcome, ResolveOutcome::Created);
        assert_ne!(other.model.id, first.model.id);
    }
}
