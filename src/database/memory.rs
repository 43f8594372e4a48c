// ABOUTME: In-process recipe and relationship store backed by tokio RwLock and DashMap
// ABOUTME: Used for tests, the CLI dry runs, and deployments without a database file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{RecipeFilter, RecipeStore, RelationshipStore};
use crate::errors::AppResult;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use recipe_hub_core::models::{
    Recipe, RecipeDraft, RecipeId, RelationshipKind, UserId, UserRelationship,
};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct RecipeTable {
    records: BTreeMap<RecipeId, Recipe>,
    high_water: Option<RecipeId>,
}

impl RecipeTable {
    fn max_id(&self) -> Option<RecipeId> {
        let live = self.records.keys().next_back().copied();
        live.max(self.high_water)
    }
}

/// In-process backend for both store traits
#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: RwLock<RecipeTable>,
    relationships: DashMap<UserId, UserRelationship>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn max_recipe_id(&self) -> AppResult<Option<RecipeId>> {
        Ok(self.recipes.read().await.max_id())
    }

    async fn insert_next(&self, draft: RecipeDraft) -> AppResult<Recipe> {
        // Id computation and insert share one write section.
        let mut table = self.recipes.write().await;
        let recipe_id = table.max_id().map_or(Ok(RecipeId::FIRST), RecipeId::next)?;
        let recipe = draft.into_recipe(recipe_id, Utc::now());
        table.records.insert(recipe_id, recipe.clone());
        Ok(recipe)
    }

    async fn find(&self, filter: &RecipeFilter) -> AppResult<Vec<Recipe>> {
        let table = self.recipes.read().await;
        Ok(table
            .records
            .values()
            .filter(|recipe| filter.matches(recipe))
            .cloned()
            .collect())
    }

    async fn find_one(&self, recipe_id: RecipeId) -> AppResult<Option<Recipe>> {
        Ok(self.recipes.read().await.records.get(&recipe_id).cloned())
    }

    async fn upsert(&self, recipe: Recipe) -> AppResult<Recipe> {
        let mut table = self.recipes.write().await;
        table.records.insert(recipe.recipe_id, recipe.clone());
        Ok(recipe)
    }

    async fn set_hidden(&self, recipe_id: RecipeId, hidden: bool) -> AppResult<bool> {
        let mut table = self.recipes.write().await;
        let Some(recipe) = table.records.get_mut(&recipe_id) else {
            return Ok(false);
        };
        recipe.hidden = hidden;
        recipe.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, recipe_id: RecipeId) -> AppResult<Option<Recipe>> {
        let mut table = self.recipes.write().await;
        let removed = table.records.remove(&recipe_id);
        if removed.is_some() {
            table.high_water = table.high_water.max(Some(recipe_id));
        }
        Ok(removed)
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn get(&self, user_id: &UserId) -> AppResult<Option<UserRelationship>> {
        Ok(self.relationships.get(user_id).map(|entry| entry.clone()))
    }

    async fn add(
        &self,
        user_id: &UserId,
        kinds: &[RelationshipKind],
        recipe_id: RecipeId,
    ) -> AppResult<bool> {
        let mut entry = self
            .relationships
            .entry(user_id.clone())
            .or_insert_with(|| UserRelationship::empty(user_id.clone()));
        let mut changed = false;
        for &kind in kinds {
            changed |= entry.insert(kind, recipe_id);
        }
        Ok(changed)
    }

    async fn remove(
        &self,
        user_id: &UserId,
        kinds: &[RelationshipKind],
        recipe_id: RecipeId,
    ) -> AppResult<bool> {
        let Some(mut entry) = self.relationships.get_mut(user_id) else {
            return Ok(false);
        };
        let mut changed = false;
        for &kind in kinds {
            changed |= entry.remove(kind, recipe_id);
        }
        Ok(changed)
    }

    async fn prune_recipe(&self, recipe_id: RecipeId) -> AppResult<u64> {
        let mut pruned = 0;
        for mut entry in self.relationships.iter_mut() {
            pruned += entry.remove_everywhere(recipe_id);
        }
        Ok(pruned)
    }

    async fn owned_recipe_ids(&self) -> AppResult<BTreeSet<RecipeId>> {
        Ok(self
            .relationships
            .iter()
            .flat_map(|entry| entry.recipes_owned.iter().copied().collect::<Vec<_>>())
            .collect())
    }

    async fn referenced_recipe_ids(&self) -> AppResult<BTreeSet<RecipeId>> {
        let mut ids = BTreeSet::new();
        for entry in &self.relationships {
            for kind in RelationshipKind::ALL {
                ids.extend(entry.set(kind).iter().copied());
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_hub_core::models::{RecipeMeta, RecipeTime};

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.to_owned(),
            category: Vec::new(),
            ingredients: Vec::new(),
            directions: vec!["stir".to_owned()],
            time: RecipeTime::default(),
            serving_size: None,
            image_url: None,
            url: None,
            meta: RecipeMeta::default(),
            hidden: false,
        }
    }

    fn id(raw: u64) -> RecipeId {
        RecipeId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.max_recipe_id().await.unwrap(), None);

        let first = store.insert_next(draft("a")).await.unwrap();
        let second = store.insert_next(draft("b")).await.unwrap();
        assert_eq!(first.recipe_id, id(1));
        assert_eq!(second.recipe_id, id(2));

        store.delete(id(2)).await.unwrap();
        assert_eq!(store.max_recipe_id().await.unwrap(), Some(id(2)));
        assert_eq!(store.insert_next(draft("c")).await.unwrap().recipe_id, id(3));
    }

    #[tokio::test]
    async fn test_set_hidden_on_missing_record() {
        let store = MemoryStore::new();
        assert!(!store.set_hidden(id(9), true).await.unwrap());
    }

    #[tokio::test]
    async fn test_relationship_sets_are_idempotent() {
        let store = MemoryStore::new();
        let user = UserId::new("u1").unwrap();

        assert!(store.get(&user).await.unwrap().is_none());
        assert!(!store
            .remove(&user, &[RelationshipKind::Starred], id(1))
            .await
            .unwrap());
        assert!(store.get(&user).await.unwrap().is_none());

        assert!(store
            .add(&user, &[RelationshipKind::Owned, RelationshipKind::Starred], id(1))
            .await
            .unwrap());
        assert!(!store
            .add(&user, &[RelationshipKind::Starred], id(1))
            .await
            .unwrap());

        let record = store.get(&user).await.unwrap().unwrap();
        assert_eq!(record.recipes_starred.len(), 1);
        assert!(record.contains(RelationshipKind::Owned, id(1)));

        assert_eq!(store.prune_recipe(id(1)).await.unwrap(), 2);
        assert!(store.referenced_recipe_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_next_refuses_past_max_id() {
        let store = MemoryStore::new();
        store
            .upsert(draft("top").into_recipe(RecipeId::MAX, Utc::now()))
            .await
            .unwrap();

        let err = store.insert_next(draft("overflow")).await.unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidFormat);
        assert_eq!(store.find(&RecipeFilter::default()).await.unwrap().len(), 1);
    }
}
