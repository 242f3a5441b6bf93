//! Command handlers and the CLI error surface.

pub mod meta;
pub mod migrate;
pub mod sync;

use thiserror::Error;

/// Errors surfaced to the top of the CLI, mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid flags or missing required configuration.
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Sync(#[from] prmirror::SyncError),

    #[error(transparent)]
    Remote(#[from] prmirror::GitHubError),

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Map an error to the process exit status.
///
/// Configuration problems (including unknown owner/repository, which are
/// raised pre-scan) exit 2; remote aborts the operator can resume from exit
/// 3; everything else exits 1.
pub fn exit_code(err: &CliError) -> i32 {
    use prmirror::SyncError;

    match err {
        CliError::Config(_) => 2,
        CliError::Sync(sync) if sync.is_configuration() => 2,
        CliError::Sync(SyncError::Authentication | SyncError::RateLimited { .. }) => 3,
        CliError::Remote(
            prmirror::GitHubError::AuthRequired | prmirror::GitHubError::RateLimited { .. },
        ) => 3,
        _ => 1,
    }
}

/// Ensure the parent directory of a SQLite database path exists.
pub fn ensure_sqlite_dir(database_url: &str) -> Result<(), CliError> {
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        // Strip query parameters (e.g. ?mode=rwc) before path operations.
        let path = path.split('?').next().unwrap_or(path);
        let path = std::path::Path::new(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}
