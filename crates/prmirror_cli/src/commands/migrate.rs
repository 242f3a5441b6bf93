//! The migrate command.

use prmirror::migration::Migrator;
use sea_orm_migration::MigratorTrait;

use crate::config::Config;
use crate::MigrateAction;

use super::{ensure_sqlite_dir, CliError};

pub async fn handle_migrate(
    action: MigrateAction,
    database_url: Option<String>,
    config: &Config,
) -> Result<(), CliError> {
    let database_url = database_url
        .or_else(|| config.database_url())
        .ok_or_else(|| CliError::Config("could not determine a database URL".to_string()))?;
    ensure_sqlite_dir(&database_url)?;

    let db = prmirror::connect(&database_url).await?;

    match action {
        MigrateAction::Up => Migrator::up(&db, None).await?,
        MigrateAction::Down => Migrator::down(&db, Some(1)).await?,
        MigrateAction::Status => Migrator::status(&db).await?,
        MigrateAction::Fresh => Migrator::fresh(&db).await?,
    }

    Ok(())
}
