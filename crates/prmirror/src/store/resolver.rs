//! The generic resolve-or-create-update primitive.
//!
//! Every entity kind is persisted through [`resolve_or_create`]. A kind
//! declares how it is looked up, versioned, inserted, and updated by
//! implementing [`Observation`]; the resolver supplies the one shared
//! algorithm. This replaces per-kind upsert code with a single descriptor
//! per kind and keeps the idempotence rules in one place.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::ConnectionTrait;

use super::errors::Result;

/// What the resolver did with an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// No row existed for the natural key; one was inserted.
    Created,
    /// A row existed and at least one mutable field was rewritten.
    Updated,
    /// A row existed and the observation carried nothing newer.
    Unchanged,
}

/// A resolved entity together with what happened to it.
#[derive(Debug, Clone)]
pub struct Resolved<M> {
    /// The persisted row, current as of this resolution.
    pub model: M,
    pub outcome: ResolveOutcome,
}

impl<M> Resolved<M> {
    /// True unless the resolution was a pure lookup.
    pub fn wrote(&self) -> bool {
        !matches!(self.outcome, ResolveOutcome::Unchanged)
    }
}

/// One observed instance of an entity kind, as fetched from the remote API.
///
/// An implementation bundles the natural key, the observed field values, and
/// the kind's update policy:
///
/// - Kinds with a version marker (pull requests, comments, review comments)
///   report it via [`observed_marker`](Observation::observed_marker) /
///   [`stored_marker`](Observation::stored_marker); the resolver skips the
///   update entirely when the observation is not strictly newer.
/// - Kinds without a marker (users, commits, events) return `None` from both
///   and instead make [`update`](Observation::update) return `None` when no
///   enrichment field would actually change.
#[async_trait]
pub trait Observation: Send + Sync + Sized {
    /// The persisted model type this observation resolves to.
    type Model: Clone + Send + Sync;

    /// Look up the persisted row by this observation's natural key.
    async fn find_existing<C: ConnectionTrait>(&self, db: &C) -> Result<Option<Self::Model>>;

    /// The observation's version marker, if this kind has one.
    fn observed_marker(&self) -> Option<NaiveDateTime> {
        None
    }

    /// The stored row's version marker, if this kind has one.
    fn stored_marker(_model: &Self::Model) -> Option<NaiveDateTime> {
        None
    }

    /// Insert a new row populated from this observation.
    async fn insert<C: ConnectionTrait>(&self, db: &C) -> Result<Self::Model>;

    /// Rewrite the kind's mutable fields on top of `existing`.
    ///
    /// Returns `None` when nothing would change; the resolver then reports
    /// the row as unchanged without issuing a write.
    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        existing: Self::Model,
    ) -> Result<Option<Self::Model>>;
}

/// Resolve an observation against the store.
///
/// Algorithm:
/// 1. Look up by natural key. Absent: insert, report `Created`.
/// 2. Present, markers comparable: an observation at or before the stored
///    marker is `Unchanged` with zero writes; a strictly newer one rewrites
///    the mutable fields and the marker, reporting `Updated`.
/// 3. Present, no marker: delegate to the kind's `update`, which only
///    writes when an enrichment field actually differs.
pub async fn resolve_or_create<C, O>(db: &C, observation: O) -> Result<Resolved<O::Model>>
where
    C: ConnectionTrait,
    O: Observation,
{
    let existing = match observation.find_existing(db).await? {
        None => {
            let model = observation.insert(db).await?;
            return Ok(Resolved {
                model,
                outcome: ResolveOutcome::Created,
            });
        }
        Some(existing) => existing,
    };

    if let (Some(observed), Some(stored)) = (
        observation.observed_marker(),
        O::stored_marker(&existing),
    ) {
        // The marker never regresses: an equal or older observation is a
        // no-op, which makes re-fetching the inclusive cursor boundary free.
        if observed <= stored {
            return Ok(Resolved {
                model: existing,
                outcome: ResolveOutcome::Unchanged,
            });
        }
    }

    match observation.update(db, existing.clone()).await? {
        Some(model) => Ok(Resolved {
            model,
            outcome: ResolveOutcome::Updated,
        }),
        None => Ok(Resolved {
            model: existing,
            outcome: ResolveOutcome::Unchanged,
        }),
    }
}
