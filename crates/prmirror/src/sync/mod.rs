//! The incremental scan engine.
//!
//! # Module structure
//!
//! - [`types`] - options, outcomes, constants
//! - [`progress`] - `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`error`] - `SyncError` taxonomy and the failure classifier
//! - [`identity`] - the run-scoped login -> user cache
//! - [`assembler`] - issue record -> pull-request aggregate
//! - [`batch`] - checkpointed batch transactions
//! - [`engine`] - `scan_repository()` / `scan_owner()`
//!
//! # Example
//!
//! ```ignore
//! use prmirror::github::GitHubSource;
//! use prmirror::sync::{scan_repository, ScanOptions};
//!
//! let db = prmirror::db::connect_and_migrate(&database_url).await?;
//! let source = GitHubSource::new(token.as_deref())?;
//! let outcome = scan_repository(&db, &source, "octo-org", "widgets",
//!                               &ScanOptions::default(), None).await?;
//! println!("mirrored {} pull requests", outcome.processed);
//! ```

pub mod assembler;
pub mod batch;
pub mod engine;
pub mod error;
pub mod identity;
mod progress;
mod types;

pub use assembler::AssembledPullRequest;
pub use batch::{BatchCheckpointer, BatchFlush};
pub use engine::{scan_owner, scan_repository};
pub use error::{classify, AssembleError, ItemDisposition, SyncError};
pub use identity::IdentityCache;
pub use progress::{emit, ProgressCallback, SyncProgress};
pub use types::{
    RepositoryScan, ScanOptions, ScanOutcome, SkippedPullRequest, DEFAULT_BATCH_SIZE,
};
