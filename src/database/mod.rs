// ABOUTME: Store contracts for recipe records and per-user recipe relationships
// ABOUTME: Backend selection between the in-process store and the SQLite store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe and Relationship Stores
//!
//! The service layer talks to two traits. [`RecipeStore`] owns recipe records
//! and id allocation; [`RelationshipStore`] owns the owned/starred/pinned
//! sets of every user. Both backends ([`memory::MemoryStore`] and
//! [`sqlite::SqliteStore`]) implement both traits on one value so a single
//! `Arc` can be handed out twice.

/// In-process backend
pub mod memory;

/// `SQLite` backend
pub mod sqlite;

use crate::config::database::DatabaseUrl;
use crate::errors::AppResult;
use async_trait::async_trait;
use recipe_hub_core::models::{
    Recipe, RecipeDraft, RecipeId, RelationshipKind, UserId, UserRelationship,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Query over recipe records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Include soft-hidden records
    pub include_hidden: bool,
    /// Case-insensitive substring the name must contain
    pub name_contains: Option<String>,
    /// Restrict to these ids
    pub ids: Option<Vec<RecipeId>>,
}

impl RecipeFilter {
    /// Every non-hidden record
    #[must_use]
    pub fn public() -> Self {
        Self::default()
    }

    /// Every record, hidden ones included
    #[must_use]
    pub fn everything() -> Self {
        Self {
            include_hidden: true,
            ..Self::default()
        }
    }

    /// Non-hidden records whose name contains `keyword`
    #[must_use]
    pub fn name_search(keyword: &str) -> Self {
        Self {
            name_contains: Some(keyword.to_owned()),
            ..Self::default()
        }
    }

    /// The given ids, hidden ones included
    #[must_use]
    pub fn by_ids(ids: impl IntoIterator<Item = RecipeId>) -> Self {
        Self {
            include_hidden: true,
            ids: Some(ids.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Whether a record passes this filter
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if recipe.hidden && !self.include_hidden {
            return false;
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&recipe.recipe_id) {
                return false;
            }
        }
        self.name_contains.as_ref().is_none_or(|needle| {
            recipe
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        })
    }
}

/// Recipe record persistence
///
/// Results are ordered by id ascending.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Largest id ever used: live records (hidden included) and hard-deleted ones
    async fn max_recipe_id(&self) -> AppResult<Option<RecipeId>>;

    /// Assign `max_recipe_id + 1` and insert, as one atomic step
    ///
    /// A duplicate key surfaces as `ResourceAlreadyExists` so the caller can retry.
    async fn insert_next(&self, draft: RecipeDraft) -> AppResult<Recipe>;

    /// Records matching the filter
    async fn find(&self, filter: &RecipeFilter) -> AppResult<Vec<Recipe>>;

    /// Record by id, hidden or not
    async fn find_one(&self, recipe_id: RecipeId) -> AppResult<Option<Recipe>>;

    /// Insert or replace the record with this id
    async fn upsert(&self, recipe: Recipe) -> AppResult<Recipe>;

    /// Set the soft-delete flag; false when no such record exists
    async fn set_hidden(&self, recipe_id: RecipeId, hidden: bool) -> AppResult<bool>;

    /// Remove the record, raising the high-water mark to its id
    async fn delete(&self, recipe_id: RecipeId) -> AppResult<Option<Recipe>>;
}

/// Per-user relationship persistence
///
/// A user's record is created by the first `add`. Set operations are
/// idempotent and report whether anything changed.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// The user's record, if one was ever created
    async fn get(&self, user_id: &UserId) -> AppResult<Option<UserRelationship>>;

    /// Upsert the record and add `recipe_id` to each listed set
    async fn add(
        &self,
        user_id: &UserId,
        kinds: &[RelationshipKind],
        recipe_id: RecipeId,
    ) -> AppResult<bool>;

    /// Pull `recipe_id` from each listed set
    async fn remove(
        &self,
        user_id: &UserId,
        kinds: &[RelationshipKind],
        recipe_id: RecipeId,
    ) -> AppResult<bool>;

    /// Pull `recipe_id` from every set of every user; returns entries removed
    async fn prune_recipe(&self, recipe_id: RecipeId) -> AppResult<u64>;

    /// Union of every user's owned set
    async fn owned_recipe_ids(&self) -> AppResult<BTreeSet<RecipeId>>;

    /// Union of every set of every user
    async fn referenced_recipe_ids(&self) -> AppResult<BTreeSet<RecipeId>>;
}

/// Both store handles over one backend
#[derive(Clone)]
pub struct Stores {
    /// Recipe records
    pub recipes: Arc<dyn RecipeStore>,
    /// User relationships
    pub relationships: Arc<dyn RelationshipStore>,
    backend: &'static str,
}

impl Stores {
    /// Wrap a backend that implements both traits
    #[must_use]
    pub fn from_backend<S>(store: Arc<S>, backend: &'static str) -> Self
    where
        S: RecipeStore + RelationshipStore + 'static,
    {
        Self::from_parts(store.clone(), store, backend)
    }

    /// Combine separately built recipe and relationship stores
    #[must_use]
    pub fn from_parts(
        recipes: Arc<dyn RecipeStore>,
        relationships: Arc<dyn RelationshipStore>,
        backend: &'static str,
    ) -> Self {
        Self {
            recipes,
            relationships,
            backend,
        }
    }

    /// Fresh in-process backend
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()), "memory")
    }

    /// Open the backend a database URL points at, running migrations
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when the `SQLite` database cannot be opened or migrated
    pub async fn open(url: &DatabaseUrl, busy_timeout: Duration) -> AppResult<Self> {
        let stores = match url {
            DatabaseUrl::InProcess => Self::in_memory(),
            DatabaseUrl::SQLite { .. } | DatabaseUrl::Memory => {
                let store = SqliteStore::connect(url, busy_timeout).await?;
                store.migrate().await?;
                Self::from_backend(Arc::new(store), "sqlite")
            }
        };
        info!(backend = stores.backend, url = %url, "Recipe stores ready");
        Ok(stores)
    }

    /// Backend label for logs
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use recipe_hub_core::models::{RecipeMeta, RecipeTime};

    fn recipe(id: u64, name: &str, hidden: bool) -> Recipe {
        RecipeDraft {
            name: name.to_owned(),
            category: Vec::new(),
            ingredients: Vec::new(),
            directions: vec!["cook".to_owned()],
            time: RecipeTime::default(),
            serving_size: None,
            image_url: None,
            url: None,
            meta: RecipeMeta::default(),
            hidden,
        }
        .into_recipe(RecipeId::new(id).unwrap(), Utc::now())
    }

    #[test]
    fn test_filter_matches() {
        let visible = recipe(1, "Tomato Soup", false);
        let hidden = recipe(2, "Tomato Pie", true);

        assert!(RecipeFilter::public().matches(&visible));
        assert!(!RecipeFilter::public().matches(&hidden));
        assert!(RecipeFilter::everything().matches(&hidden));

        let search = RecipeFilter::name_search("TOMATO");
        assert!(search.matches(&visible));
        assert!(!search.matches(&hidden));
        assert!(!RecipeFilter::name_search("bread").matches(&visible));

        let by_ids = RecipeFilter::by_ids([RecipeId::new(2).unwrap()]);
        assert!(by_ids.matches(&hidden));
        assert!(!by_ids.matches(&visible));
    }
}
