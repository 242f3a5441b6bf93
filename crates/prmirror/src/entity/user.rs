//! User entity - GitHub accounts referenced by pull-request activity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User model. The natural key is `login`.
///
/// `name` and `email` are enrichable: a later observation (typically the git
/// metadata embedded in a commit) may fill them in after the row already
/// exists, since account profiles often lack both.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Account login, unique across the store.
    pub login: String,

    /// Display name, if known.
    pub name: Option<String>,
    /// Email address, if known.
    pub email: Option<String>,
    /// Avatar image URL.
    #[sea_orm(column_type = "Text", nullable)]
    pub avatar_url: Option<String>,
    /// Profile API URL.
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,
    /// Account type ("User", "Organization", "Bot").
    pub account_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
