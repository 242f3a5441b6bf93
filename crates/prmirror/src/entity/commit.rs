//! Commit entity - commits belonging to a pull request.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Commit model. Natural key: `(pull_request_id, sha)`.
///
/// `author_date` and `commit_date` come from the git metadata embedded in
/// the commit object, not from the linked accounts.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commits")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub pull_request_id: Uuid,
    pub sha: String,

    /// Linked author account; null when no account matches the git identity.
    pub author_id: Option<Uuid>,
    /// Linked committer account.
    pub committer_id: Option<Uuid>,
    pub author_date: Option<ChronoDateTime>,
    pub commit_date: Option<ChronoDateTime>,
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
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
}

impl Related<super::pull_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
