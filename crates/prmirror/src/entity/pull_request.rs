//! PullRequest entity - the central aggregate root of the mirror.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// PullRequest model. The natural key is the remote numeric id (`github_id`).
///
/// `number` and `created_at` are immutable after creation. `updated_at`
/// stores the *issue* object's update timestamp, not the pull-request
/// object's own, and never regresses (see the resolver's marker comparison).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pull_requests")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Remote numeric id, unique across the store.
    pub github_id: i64,
    /// Pull-request number within its repository.
    pub number: i64,

    /// Repository this pull request belongs to.
    pub repository_id: Uuid,

    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    /// Remote state ("open", "closed").
    pub state: Option<String>,

    pub created_at: ChronoDateTime,
    /// Latest known remote update instant (the issue's, see above).
    pub updated_at: ChronoDateTime,
    pub closed_at: Option<ChronoDateTime>,
    pub merged_at: Option<ChronoDateTime>,

    // ─── Merge metadata (populated by the API only post-merge) ───────────────
    pub merged: bool,
    pub mergeable_state: Option<String>,
    pub merge_commit_sha: Option<String>,
    pub additions: Option<i32>,
    pub deletions: Option<i32>,
    pub changed_files: Option<i32>,

    // ─── Participants ────────────────────────────────────────────────────────
    /// Author.
    pub author_id: Option<Uuid>,
    /// Assignee, if any.
    pub assignee_id: Option<Uuid>,
    /// Account that performed the merge, if merged.
    pub merged_by_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository::Entity",
        from = "Column::RepositoryId",
        to = "super::repository::Column::Id"
    )]
    Repository,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::review_comment::Entity")]
    ReviewComment,
    #[sea_orm(has_many = "super::commit::Entity")]
    Commit,
    #[sea_orm(has_many = "super::event::Entity")]
    Event,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::review_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewComment.def()
    }
}

impl Related<super::commit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commit.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
