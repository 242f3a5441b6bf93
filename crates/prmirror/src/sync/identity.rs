//! Run-scoped identity cache.
//!
//! Users are referenced many times within one run (as authors, assignees,
//! commenters, committers, event actors); the cache deduplicates the store
//! round-trips for them. It is constructed per invocation, owned by exactly
//! one run, and discarded at the end - a call-deduplication optimization,
//! never a durable cache.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;

use crate::entity::user;
use crate::github::types::UserRef;
use crate::store::observations::UserObservation;
use crate::store::{resolve_or_create, StoreError};

/// Memoized mapping from login to resolved persisted identity.
#[derive(Default)]
pub struct IdentityCache {
    users: HashMap<String, user::Model>,
    /// Logins first cached since the last item boundary. Identities resolved
    /// inside a rolled-back savepoint must not be reused, so the engine
    /// clears or evicts these at each boundary.
    pending: Vec<String>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a user reference to its persisted identity.
    ///
    /// An absent reference (the remote API reports no actor, e.g. a deleted
    /// account) resolves to `None`; the corresponding relationship stays
    /// optional. The first reference to a login goes through the resolver;
    /// later references within the run return the cached identity.
    pub async fn resolve<C: ConnectionTrait>(
        &mut self,
        db: &C,
        reference: Option<&UserRef>,
    ) -> Result<Option<user::Model>, StoreError> {
        let Some(reference) = reference else {
            return Ok(None);
        };

        if let Some(cached) = self.users.get(&reference.login) {
            return Ok(Some(cached.clone()));
        }

        let resolved = resolve_or_create(
            db,
            UserObservation {
                login: reference.login.clone(),
                avatar_url: reference.avatar_url.clone(),
                url: reference.url.clone(),
                account_type: reference.account_type.clone(),
                ..UserObservation::default()
            },
        )
        .await?;

        self.users
            .insert(reference.login.clone(), resolved.model.clone());
        self.pending.push(reference.login.clone());
        Ok(Some(resolved.model))
    }

    /// Back-fill a user's display name and email from commit metadata.
    ///
    /// Account profiles often lack both; the git identity embedded in a
    /// commit is the only place they show up. A no-op when neither value is
    /// provided or nothing differs from the stored row.
    pub async fn enrich<C: ConnectionTrait>(
        &mut self,
        db: &C,
        login: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), StoreError> {
        if name.is_none() && email.is_none() {
            return Ok(());
        }

        let newly_cached = !self.users.contains_key(login);
        let resolved = resolve_or_create(
            db,
            UserObservation {
                login: login.to_string(),
                name: name.map(str::to_string),
                email: email.map(str::to_string),
                ..UserObservation::default()
            },
        )
        .await?;

        self.users.insert(login.to_string(), resolved.model);
        if newly_cached {
            self.pending.push(login.to_string());
        }
        Ok(())
    }

    /// Keep identities cached since the last boundary.
    pub fn commit_item(&mut self) {
        self.pending.clear();
    }

    /// Evict identities cached since the last boundary. Their rows may have
    /// been rolled back with the item's savepoint; the next reference
    /// re-resolves them against the store.
    pub fn rollback_item(&mut self) {
        for login in self.pending.drain(..) {
            self.users.remove(&login);
        }
    }

    /// Number of distinct identities resolved so far this run.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_and_migrate;
    use crate::entity::prelude::User;
    use sea_orm::EntityTrait;

    fn reference(login: &str) -> UserRef {
        UserRef {
            login: login.to_string(),
            avatar_url: None,
            url: None,
            account_type: Some("User".to_string()),
        }
    }

    #[tokio::test]
    async fn absent_reference_resolves_to_none() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db");
        let mut cache = IdentityCache::new();

        let resolved = cache.resolve(&db, None).await.expect("resolve");
        assert!(resolved.is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn repeated_references_share_one_row() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db");
        let mut cache = IdentityCache::new();

        let first = cache
            .resolve(&db, Some(&reference("octocat")))
            .await
            .expect("resolve")
            .expect("identity");
        let second = cache
            .resolve(&db, Some(&reference("octocat")))
            .await
            .expect("resolve")
            .expect("identity");

        assert_eq!(first.id, second.id);
        assert_eq!(cache.len(), 1);

        let rows = User::find().all(&db).await.expect("query");
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn rollback_evicts_identities_cached_during_the_item() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db");
        let mut cache = IdentityCache::new();

        cache
            .resolve(&db, Some(&reference("kept")))
            .await
            .expect("resolve");
        cache.commit_item();

        cache
            .resolve(&db, Some(&reference("doomed")))
            .await
            .expect("resolve");
        cache.rollback_item();

        assert_eq!(cache.len(), 1);
        assert!(cache.users.contains_key("kept"));
        assert!(!cache.users.contains_key("doomed"));
    }

    #[tokio::test]
    async fn enrich_fills_name_and_email_from_commit_metadata() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db");
        let mut cache = IdentityCache::new();

        cache
            .resolve(&db, Some(&reference("octocat")))
            .await
            .expect("resolve");
        cache
            .enrich(&db, "octocat", Some("The Octocat"), Some("octocat@example.com"))
            .await
            .expect("enrich");

        let row = User::find()
            .one(&db)
            .await
            .expect("query")
            .expect("user row");
        assert_eq!(row.name.as_deref(), Some("The Octocat"));
        assert_eq!(row.email.as_deref(), Some("octocat@example.com"));
    }
}
