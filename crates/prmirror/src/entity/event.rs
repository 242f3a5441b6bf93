//! Event entity - issue lifecycle events on a pull request.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event model. The natural key is the remote event id (`github_id`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Remote event id, unique across the store.
    pub github_id: i64,

    pub pull_request_id: Uuid,
    /// Event kind ("closed", "merged", "labeled", ...).
    pub kind: String,
    pub created_at: ChronoDateTime,
    /// Commit associated with the event, if any.
    pub commit_sha: Option<String>,
    /// Acting account; null when the account was deleted.
    pub actor_id: Option<Uuid>,
    /// Kind-specific payload: the label name for "labeled"/"unlabeled".
    pub extra: Option<String>,
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
        from = "Column::ActorId",
        to = "super::user::Column::Id"
    )]
    Actor,
}

impl Related<super::pull_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
