// ABOUTME: SQLite implementation of the recipe and relationship stores using sqlx
// ABOUTME: Atomic id allocation via INSERT ... SELECT MAX(...) + 1 with a deleted-id watermark
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{RecipeFilter, RecipeStore, RelationshipStore};
use crate::config::database::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipe_hub_core::models::{
    IngredientEntry, Recipe, RecipeDraft, RecipeId, RecipeMeta, RecipeTime, RelationshipKind,
    UserId, UserRelationship,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const RECIPE_COLUMNS: &str = "recipe_id, name, category, ingredients, directions, \
     prep_hours, prep_minutes, cook_hours, cook_minutes, serving_size, image_url, url, \
     votes, rating, hidden, created_at, updated_at";

/// `SQLite` backend for both store traits
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a pool for the given URL
    ///
    /// The database file is created when missing. An in-memory database is
    /// private to its connection, so the pool is capped at one connection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established
    pub async fn connect(url: &DatabaseUrl, busy_timeout: Duration) -> AppResult<Self> {
        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::database(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| AppError::database(format!("Invalid SQLite URL {url}: {e}")))?
            .create_if_missing(true)
            .busy_timeout(busy_timeout)
            .foreign_keys(true);

        let max_connections = if url.is_memory() { 1 } else { 8 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open SQLite database: {e}")))?;

        Ok(Self { pool })
    }

    /// Create tables if they do not exist
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                recipe_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT '[]',
                ingredients TEXT NOT NULL DEFAULT '[]',
                directions TEXT NOT NULL DEFAULT '[]',
                prep_hours INTEGER NOT NULL DEFAULT 0,
                prep_minutes INTEGER NOT NULL DEFAULT 0,
                cook_hours INTEGER NOT NULL DEFAULT 0,
                cook_minutes INTEGER NOT NULL DEFAULT 0,
                serving_size INTEGER,
                image_url TEXT,
                url TEXT,
                votes INTEGER NOT NULL DEFAULT 1,
                rating REAL,
                hidden INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipes table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_id_watermark (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                high_water INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create watermark table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_relationships (
                user_id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create relationships table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_recipe_entries (
                user_id TEXT NOT NULL REFERENCES user_relationships(user_id),
                kind TEXT NOT NULL CHECK (kind IN ('owned', 'starred', 'pinned')),
                recipe_id INTEGER NOT NULL,
                PRIMARY KEY (user_id, kind, recipe_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create entries table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_user_recipe_entries_recipe ON user_recipe_entries(recipe_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create entries index: {e}")))?;

        debug!("SQLite recipe schema ready");
        Ok(())
    }
}

struct EncodedRecipe {
    category: String,
    ingredients: String,
    directions: String,
}

fn encode(
    category: &[String],
    ingredients: &[IngredientEntry],
    directions: &[String],
) -> AppResult<EncodedRecipe> {
    Ok(EncodedRecipe {
        category: serde_json::to_string(category)?,
        ingredients: serde_json::to_string(ingredients)?,
        directions: serde_json::to_string(directions)?,
    })
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp {raw:?}: {e}")))
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let recipe_id: i64 = row.get("recipe_id");
    let category_json: String = row.get("category");
    let ingredients_json: String = row.get("ingredients");
    let directions_json: String = row.get("directions");
    let serving_size: Option<i64> = row.get("serving_size");
    let votes: i64 = row.get("votes");
    let hidden: i64 = row.get("hidden");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Recipe {
        recipe_id: RecipeId::from_i64(recipe_id)?,
        name: row.get("name"),
        category: serde_json::from_str(&category_json)?,
        ingredients: serde_json::from_str(&ingredients_json)?,
        directions: serde_json::from_str(&directions_json)?,
        time: RecipeTime {
            prep_hours: row.get("prep_hours"),
            prep_minutes: row.get("prep_minutes"),
            cook_hours: row.get("cook_hours"),
            cook_minutes: row.get("cook_minutes"),
        },
        serving_size: serving_size.and_then(|n| u32::try_from(n).ok()),
        image_url: row.get("image_url"),
        url: row.get("url"),
        meta: RecipeMeta {
            votes: u32::try_from(votes).unwrap_or(0),
            rating: row.get("rating"),
        },
        hidden: hidden != 0,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn max_recipe_id(&self) -> AppResult<Option<RecipeId>> {
        let row = sqlx::query(
            r"
            SELECT MAX(
                COALESCE((SELECT MAX(recipe_id) FROM recipes), 0),
                COALESCE((SELECT high_water FROM recipe_id_watermark WHERE id = 1), 0)
            ) AS max_id
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read max recipe id: {e}")))?;

        let max_id: i64 = row.get("max_id");
        if max_id == 0 {
            return Ok(None);
        }
        RecipeId::from_i64(max_id).map(Some)
    }

    async fn insert_next(&self, draft: RecipeDraft) -> AppResult<Recipe> {
        let now = Utc::now();
        let encoded = encode(&draft.category, &draft.ingredients, &draft.directions)?;

        // Id selection and insert run as one statement, so SQLite's write lock
        // serializes concurrent allocations. The guard keeps MAX + 1 inside INTEGER range.
        let row = sqlx::query(
            r"
            INSERT INTO recipes (
                recipe_id, name, category, ingredients, directions,
                prep_hours, prep_minutes, cook_hours, cook_minutes, serving_size,
                image_url, url, votes, rating, hidden, created_at, updated_at
            )
            SELECT current_max + 1,
                   $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15
            FROM (
                SELECT MAX(
                    COALESCE((SELECT MAX(recipe_id) FROM recipes), 0),
                    COALESCE((SELECT high_water FROM recipe_id_watermark WHERE id = 1), 0)
                ) AS current_max
            )
            WHERE current_max < $16
            RETURNING recipe_id
            ",
        )
        .bind(&draft.name)
        .bind(&encoded.category)
        .bind(&encoded.ingredients)
        .bind(&encoded.directions)
        .bind(draft.time.prep_hours)
        .bind(draft.time.prep_minutes)
        .bind(draft.time.cook_hours)
        .bind(draft.time.cook_minutes)
        .bind(draft.serving_size.map(i64::from))
        .bind(&draft.image_url)
        .bind(&draft.url)
        .bind(i64::from(draft.meta.votes))
        .bind(draft.meta.rating)
        .bind(draft.hidden)
        .bind(now.to_rfc3339())
        .bind(RecipeId::MAX.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Err(AppError::invalid_format(format!(
                "recipe id space exhausted at {}",
                RecipeId::MAX
            )));
        };
        let recipe_id = RecipeId::from_i64(row.get("recipe_id"))?;
        debug!(recipe_id = %recipe_id, "Inserted recipe");
        Ok(draft.into_recipe(recipe_id, now))
    }

    async fn find(&self, filter: &RecipeFilter) -> AppResult<Vec<Recipe>> {
        let mut conditions = Vec::new();
        if !filter.include_hidden {
            conditions.push("hidden = 0".to_owned());
        }
        if filter.name_contains.is_some() {
            conditions.push("instr(lower(name), ?) > 0".to_owned());
        }
        if let Some(ids) = &filter.ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            conditions.push(format!("recipe_id IN ({placeholders})"));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes {where_clause} ORDER BY recipe_id");
        let mut query = sqlx::query(&sql);
        if let Some(needle) = &filter.name_contains {
            query = query.bind(needle.to_lowercase());
        }
        if let Some(ids) = &filter.ids {
            for id in ids {
                query = query.bind(id.as_i64());
            }
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to query recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    async fn find_one(&self, recipe_id: RecipeId) -> AppResult<Option<Recipe>> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE recipe_id = $1");
        let row = sqlx::query(&sql)
            .bind(recipe_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    async fn upsert(&self, recipe: Recipe) -> AppResult<Recipe> {
        let encoded = encode(&recipe.category, &recipe.ingredients, &recipe.directions)?;

        sqlx::query(
            r"
            INSERT INTO recipes (
                recipe_id, name, category, ingredients, directions,
                prep_hours, prep_minutes, cook_hours, cook_minutes, serving_size,
                image_url, url, votes, rating, hidden, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT(recipe_id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                ingredients = excluded.ingredients,
                directions = excluded.directions,
                prep_hours = excluded.prep_hours,
                prep_minutes = excluded.prep_minutes,
                cook_hours = excluded.cook_hours,
                cook_minutes = excluded.cook_minutes,
                serving_size = excluded.serving_size,
                image_url = excluded.image_url,
                url = excluded.url,
                votes = excluded.votes,
                rating = excluded.rating,
                hidden = excluded.hidden,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            ",
        )
        .bind(recipe.recipe_id.as_i64())
        .bind(&recipe.name)
        .bind(&encoded.category)
        .bind(&encoded.ingredients)
        .bind(&encoded.directions)
        .bind(recipe.time.prep_hours)
        .bind(recipe.time.prep_minutes)
        .bind(recipe.time.cook_hours)
        .bind(recipe.time.cook_minutes)
        .bind(recipe.serving_size.map(i64::from))
        .bind(&recipe.image_url)
        .bind(&recipe.url)
        .bind(i64::from(recipe.meta.votes))
        .bind(recipe.meta.rating)
        .bind(recipe.hidden)
        .bind(recipe.created_at.to_rfc3339())
        .bind(recipe.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert recipe: {e}")))?;

        Ok(recipe)
    }

    async fn set_hidden(&self, recipe_id: RecipeId, hidden: bool) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE recipes SET hidden = $1, updated_at = $2 WHERE recipe_id = $3")
                .bind(hidden)
                .bind(Utc::now().to_rfc3339())
                .bind(recipe_id.as_i64())
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, recipe_id: RecipeId) -> AppResult<Option<Recipe>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let sql = format!("DELETE FROM recipes WHERE recipe_id = $1 RETURNING {RECIPE_COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(recipe_id.as_i64())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let recipe = row_to_recipe(&row)?;

        sqlx::query(
            r"
            INSERT INTO recipe_id_watermark (id, high_water) VALUES (1, $1)
            ON CONFLICT(id) DO UPDATE SET high_water = MAX(high_water, excluded.high_water)
            ",
        )
        .bind(recipe_id.as_i64())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to raise id watermark: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit delete: {e}")))?;

        Ok(Some(recipe))
    }
}

fn collect_ids(rows: &[SqliteRow]) -> AppResult<BTreeSet<RecipeId>> {
    rows.iter()
        .map(|row| RecipeId::from_i64(row.get("recipe_id")))
        .collect()
}

#[async_trait]
impl RelationshipStore for SqliteStore {
    async fn get(&self, user_id: &UserId) -> AppResult<Option<UserRelationship>> {
        let exists = sqlx::query("SELECT 1 FROM user_relationships WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get relationship: {e}")))?;
        if exists.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query(
            "SELECT kind, recipe_id FROM user_recipe_entries WHERE user_id = $1 ORDER BY recipe_id",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get relationship entries: {e}")))?;

        let mut relationship = UserRelationship::empty(user_id.clone());
        for row in &rows {
            let kind: String = row.get("kind");
            let recipe_id: i64 = row.get("recipe_id");
            relationship.insert(
                RelationshipKind::parse(&kind)?,
                RecipeId::from_i64(recipe_id)?,
            );
        }
        Ok(Some(relationship))
    }

    async fn add(
        &self,
        user_id: &UserId,
        kinds: &[RelationshipKind],
        recipe_id: RecipeId,
    ) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            "INSERT INTO user_relationships (user_id, created_at) VALUES ($1, $2) ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert relationship: {e}")))?;

        let mut changed = false;
        for kind in kinds {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO user_recipe_entries (user_id, kind, recipe_id) VALUES ($1, $2, $3)",
            )
            .bind(user_id.as_str())
            .bind(kind.as_str())
            .bind(recipe_id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to add relationship entry: {e}")))?;
            changed |= result.rows_affected() > 0;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit relationship: {e}")))?;
        Ok(changed)
    }

    async fn remove(
        &self,
        user_id: &UserId,
        kinds: &[RelationshipKind],
        recipe_id: RecipeId,
    ) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let mut changed = false;
        for kind in kinds {
            let result = sqlx::query(
                "DELETE FROM user_recipe_entries WHERE user_id = $1 AND kind = $2 AND recipe_id = $3",
            )
            .bind(user_id.as_str())
            .bind(kind.as_str())
            .bind(recipe_id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to remove relationship entry: {e}"))
            })?;
            changed |= result.rows_affected() > 0;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit relationship: {e}")))?;
        Ok(changed)
    }

    async fn prune_recipe(&self, recipe_id: RecipeId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM user_recipe_entries WHERE recipe_id = $1")
            .bind(recipe_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to prune relationships: {e}")))?;
        Ok(result.rows_affected())
    }

    async fn owned_recipe_ids(&self) -> AppResult<BTreeSet<RecipeId>> {
        let rows =
            sqlx::query("SELECT DISTINCT recipe_id FROM user_recipe_entries WHERE kind = 'owned'")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to list owned recipes: {e}")))?;
        collect_ids(&rows)
    }

    async fn referenced_recipe_ids(&self) -> AppResult<BTreeSet<RecipeId>> {
        let rows = sqlx::query("SELECT DISTINCT recipe_id FROM user_recipe_entries")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to list referenced recipes: {e}"))
            })?;
        collect_ids(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteStore {
        let store = SqliteStore::connect(&DatabaseUrl::Memory, Duration::from_secs(1))
            .await
            .unwrap();
        store.migrate().await.unwrap();
        store
    }

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.to_owned(),
            category: vec!["dinner".to_owned()],
            ingredients: Vec::new(),
            directions: vec!["bake".to_owned()],
            time: RecipeTime {
                prep_hours: 0,
                prep_minutes: -30,
                cook_hours: 1,
                cook_minutes: 0,
            },
            serving_size: Some(2),
            image_url: None,
            url: Some("https://example.com".to_owned()),
            meta: RecipeMeta {
                votes: 1,
                rating: Some(3.5),
            },
            hidden: false,
        }
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = store().await;
        store.migrate().await.unwrap();
        assert_eq!(store.max_recipe_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_next_round_trips_fields() {
        let store = store().await;
        let created = store.insert_next(draft("Lasagna")).await.unwrap();
        assert_eq!(created.recipe_id, RecipeId::FIRST);

        let loaded = store.find_one(created.recipe_id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Lasagna");
        assert_eq!(loaded.time.prep_minutes, -30);
        assert_eq!(loaded.meta.rating, Some(3.5));
        assert_eq!(loaded.serving_size, Some(2));
        assert_eq!(loaded.category, vec!["dinner"]);
    }

    #[tokio::test]
    async fn test_delete_raises_watermark() {
        let store = store().await;
        store.insert_next(draft("a")).await.unwrap();
        let second = store.insert_next(draft("b")).await.unwrap();

        let deleted = store.delete(second.recipe_id).await.unwrap();
        assert_eq!(deleted.map(|r| r.name), Some("b".to_owned()));
        assert!(store.delete(second.recipe_id).await.unwrap().is_none());

        let third = store.insert_next(draft("c")).await.unwrap();
        assert_eq!(third.recipe_id.get(), 3);
    }

    #[tokio::test]
    async fn test_relationship_record_created_on_first_add() {
        let store = store().await;
        let user = UserId::new("cook-1").unwrap();
        let id = RecipeId::FIRST;

        assert!(store.get(&user).await.unwrap().is_none());
        assert!(store
            .add(&user, &[RelationshipKind::Owned, RelationshipKind::Pinned], id)
            .await
            .unwrap());
        assert!(!store.add(&user, &[RelationshipKind::Pinned], id).await.unwrap());

        let record = store.get(&user).await.unwrap().unwrap();
        assert!(record.contains(RelationshipKind::Owned, id));
        assert!(record.contains(RelationshipKind::Pinned, id));
        assert!(!record.contains(RelationshipKind::Starred, id));

        assert_eq!(store.owned_recipe_ids().await.unwrap().len(), 1);
        assert_eq!(store.prune_recipe(id).await.unwrap(), 2);
        let record = store.get(&user).await.unwrap().unwrap();
        assert!(record.recipes_owned.is_empty());
    }

    #[tokio::test]
    async fn test_remove_clears_every_requested_set() {
        let store = store().await;
        let user = UserId::new("cook-2").unwrap();
        let id = RecipeId::FIRST;
        store.add(&user, &RelationshipKind::ALL, id).await.unwrap();

        assert!(store.remove(&user, &RelationshipKind::ALL, id).await.unwrap());
        assert!(!store.remove(&user, &RelationshipKind::ALL, id).await.unwrap());
        assert!(store.referenced_recipe_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_next_refuses_past_max_id() {
        let store = store().await;
        let top = draft("Top").into_recipe(RecipeId::MAX, Utc::now());
        store.upsert(top).await.unwrap();

        let err = store.insert_next(draft("Overflow")).await.unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidFormat);

        let stored = store.find_one(RecipeId::MAX).await.unwrap().unwrap();
        assert_eq!(stored.recipe_id, RecipeId::MAX);
        assert_eq!(store.max_recipe_id().await.unwrap(), Some(RecipeId::MAX));
    }
}
