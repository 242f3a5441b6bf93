//! Persistence layer: natural-key resolution and cursor queries.
//!
//! The central piece is [`resolver::resolve_or_create`], the single
//! get-or-create-or-update primitive every entity kind goes through. Each
//! kind supplies an [`resolver::Observation`] describing its natural key,
//! version marker, and mutable-field set; the resolver owns the comparison
//! logic, so re-running a scan against unchanged remote state produces zero
//! writes beyond the lookups.

mod errors;
pub mod observations;
pub mod queries;
pub mod resolver;

pub use errors::{Result, StoreError};
pub use resolver::{resolve_or_create, Observation, ResolveOutcome, Resolved};
