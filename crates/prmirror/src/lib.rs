//! prmirror - an incremental pull-request activity mirror.
//!
//! Mirrors pull requests, their comments, review comments, commits, and
//! lifecycle events from GitHub into a relational store, across repeated
//! runs, without duplicating or losing data.
//!
//! # Architecture
//!
//! - [`github`] - the remote collaborator: wire types, error mapping, the
//!   [`github::ActivitySource`] seam and its octocrab implementation, and
//!   the lazy [`github::IssueStream`].
//! - [`store`] - the persistence layer: natural-key resolution through one
//!   generic [`store::resolve_or_create`] primitive plus cursor queries.
//! - [`sync`] - the scan engine: identity cache, pull-request assembler,
//!   batch checkpointer, failure classification, and the
//!   [`sync::scan_repository`] / [`sync::scan_owner`] entry points.
//! - [`entity`] / [`migration`] - schema definitions.
//!
//! # Example
//!
//! ```ignore
//! use prmirror::github::GitHubSource;
//! use prmirror::sync::{scan_owner, ScanOptions};
//!
//! let db = prmirror::db::connect_and_migrate("sqlite://prmirror.db?mode=rwc").await?;
//! let source = GitHubSource::new(Some("ghp_..."))?;
//! let scans = scan_owner(&db, &source, "octo-org", &ScanOptions::default(), None).await?;
//! ```

pub mod db;
pub mod entity;
pub mod github;
pub mod migration;
pub mod store;
pub mod sync;

pub use db::{connect, connect_and_migrate};
pub use entity::prelude::*;
pub use github::{ActivitySource, GitHubError, GitHubSource, IssueStream};
pub use store::{ResolveOutcome, StoreError};
pub use sync::{ScanOptions, ScanOutcome, SyncError};
