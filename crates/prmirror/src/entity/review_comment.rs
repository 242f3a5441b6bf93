//! ReviewComment entity - inline review comments on a pull request's diff.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// ReviewComment model.
///
/// Natural key: `(pull_request_id, commit_sha, user_id, created_at)`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review_comments")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub pull_request_id: Uuid,
    /// Commit the comment is anchored to.
    pub commit_sha: String,
    /// Commenting account; null when the account was deleted.
    pub user_id: Option<Uuid>,
    pub created_at: ChronoDateTime,

    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,
    pub updated_at: ChronoDateTime,
    /// Commit the comment was originally written against, before pushes.
    pub original_commit_sha: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pull_request::Entity",
        from = "Column::PullRequestId",
        to = "super::pull_request::Column::Id"
    )]
    PullRequest,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::pull_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequest.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
