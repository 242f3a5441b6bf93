//! Cursor and lookup queries used by the scan engine.

use chrono::NaiveDateTime;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect,
};
use uuid::Uuid;

use crate::entity::{pull_request, repository};

use super::errors::Result;

/// Find a repository by its natural key.
pub async fn find_repository<C: ConnectionTrait>(
    db: &C,
    owner: &str,
    name: &str,
) -> Result<Option<repository::Model>> {
    Ok(repository::Entity::find()
        .filter(repository::Column::Owner.eq(owner))
        .filter(repository::Column::Name.eq(name))
        .one(db)
        .await?)
}

/// The update instant of the most recently synchronized pull request of a
/// repository, used as the `since` cursor for the next run.
///
/// Returns `None` when the repository has no pull requests yet (first run).
pub async fn latest_synced_timestamp<C: ConnectionTrait>(
    db: &C,
    repository_id: Uuid,
) -> Result<Option<NaiveDateTime>> {
    let max: Option<Option<NaiveDateTime>> = pull_request::Entity::find()
        .filter(pull_request::Column::RepositoryId.eq(repository_id))
        .select_only()
        .column_as(pull_request::Column::UpdatedAt.max(), "last_update")
        .into_tuple()
        .one(db)
        .await?;

    Ok(max.flatten())
}
