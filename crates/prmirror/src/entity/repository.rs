//! Repository entity - one row per mirrored GitHub repository.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Repository model. The natural key is `(owner, name)`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repositories")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owner login (user or organization).
    pub owner: String,
    /// Repository name (URL-safe slug).
    pub name: String,

    /// Display name reported by the API.
    pub display_name: Option<String>,
    /// Canonical HTML URL.
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A repository owns its pull requests.
    #[sea_orm(has_many = "super::pull_request::Entity")]
    PullRequest,
}

impl Related<super::pull_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Compute the full name (owner/name).
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}
