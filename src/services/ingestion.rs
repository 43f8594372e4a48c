// ABOUTME: Recipe ingestion orchestration across the recipe and relationship stores
// ABOUTME: Manual create, scrape create, edit, star/pin toggles, remove, hard delete, and orphan repair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ingestion Orchestrator
//!
//! [`RecipeService`] sequences normalization, id allocation, persistence, and
//! relationship updates. Each flow writes the recipe record first; the
//! ownership update that follows is secondary and never rolls the record back.
//!
//! Hard delete runs in two phases (record, then relationship fan-out). If the
//! second phase fails the dangling ids are harmless and
//! [`RecipeService::prune_dangling_relationships`] clears them later.

use super::context::RequestContext;
use super::id_allocator::IdAllocator;
use crate::config::{ScraperConfig, ServerConfig};
use crate::database::{RecipeFilter, Stores};
use crate::errors::{AppError, AppResult};
use crate::normalization::{ManualSubmission, RecipeNormalizer};
use crate::scraper::{HttpRecipeScraper, RecipeScraper};
use chrono::Utc;
use recipe_hub_core::models::{Recipe, RecipeId, RecipeSummary, RelationshipKind, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use url::Url;

const OWNER_SETS: [RelationshipKind; 2] = [RelationshipKind::Owned, RelationshipKind::Starred];

/// Result of a create flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutcome {
    /// The persisted record
    pub recipe: Recipe,
    /// False when there was no user or the ownership update failed
    pub owner_attached: bool,
}

/// Result of a star/pin toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipAck {
    /// Target recipe
    pub recipe_id: RecipeId,
    /// Set that was touched
    pub kind: RelationshipKind,
    /// False when the set already had the requested state
    pub changed: bool,
}

/// Result of a user's remove action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveOutcome {
    /// Target recipe
    pub recipe_id: RecipeId,
    /// True when the caller owned the recipe and it was soft-hidden
    pub hidden: bool,
}

/// Result of an administrative hard delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    /// The removed record, if it still existed
    pub recipe: Option<Recipe>,
    /// Relationship entries pruned across all users
    pub pruned_entries: u64,
}

/// Recipe ingestion and relationship orchestration
#[derive(Clone)]
pub struct RecipeService {
    stores: Stores,
    allocator: IdAllocator,
    normalizer: RecipeNormalizer,
    scraper: Arc<dyn RecipeScraper>,
}

impl RecipeService {
    /// Assemble a service from its collaborators
    #[must_use]
    pub fn new(stores: Stores, scraper: Arc<dyn RecipeScraper>, max_retries: u32) -> Self {
        Self {
            allocator: IdAllocator::new(stores.recipes.clone(), max_retries),
            stores,
            normalizer: RecipeNormalizer::default(),
            scraper,
        }
    }

    /// Replace the normalizer (custom ingredient parser)
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: RecipeNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Open stores and build the HTTP scraper from configuration
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when the stores cannot be opened
    pub async fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let stores = Stores::open(&config.database.url, config.database.busy_timeout).await?;
        Ok(Self::new(
            stores,
            Arc::new(scraper_from_config(&config.scraper)),
            config.ingestion.id_allocation_max_retries,
        ))
    }

    /// Id allocator used by the create flows
    #[must_use]
    pub const fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    /// Underlying stores
    #[must_use]
    pub const fn stores(&self) -> &Stores {
        &self.stores
    }

    // ================================================================================
    // Reads
    // ================================================================================

    /// Summaries of every non-hidden recipe, ordered by id
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on store failure
    pub async fn list_public(&self) -> AppResult<Vec<RecipeSummary>> {
        let recipes = self.stores.recipes.find(&RecipeFilter::public()).await?;
        Ok(recipes.iter().map(Recipe::summary).collect())
    }

    /// Full record by id, hidden or not
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on store failure; an unknown id is `Ok(None)`
    pub async fn get_recipe(&self, recipe_id: RecipeId) -> AppResult<Option<Recipe>> {
        self.stores.recipes.find_one(recipe_id).await
    }

    /// Record to pre-fill an edit form
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on store failure; an unknown id is `Ok(None)`
    pub async fn edit_lookup(&self, recipe_id: RecipeId) -> AppResult<Option<Recipe>> {
        self.stores.recipes.find_one(recipe_id).await
    }

    /// Case-insensitive name search over non-hidden recipes
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on store failure
    pub async fn search(&self, keyword: &str) -> AppResult<Vec<RecipeSummary>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        let recipes = self
            .stores
            .recipes
            .find(&RecipeFilter::name_search(keyword))
            .await?;
        Ok(recipes.iter().map(Recipe::summary).collect())
    }

    // ================================================================================
    // Ingestion flows
    // ================================================================================

    /// Normalize, persist, and attach ownership for a manual submission
    ///
    /// # Errors
    ///
    /// Returns a validation error before any id is consumed, or the store
    /// error if the insert fails
    #[instrument(skip(self, ctx, submission), fields(request_id = %ctx.request_id))]
    pub async fn create_manual(
        &self,
        ctx: &RequestContext,
        submission: &ManualSubmission,
    ) -> AppResult<CreateOutcome> {
        let draft = self
            .normalizer
            .normalize_manual(submission)
            .map_err(|e| e.with_request_id(ctx.request_id.to_string()))?;
        let recipe = self.allocator.create(draft).await?;
        let owner_attached = self.attach_owner(ctx, recipe.recipe_id).await;

        info!(recipe_id = %recipe.recipe_id, owner_attached, "Created recipe from submission");
        Ok(CreateOutcome {
            recipe,
            owner_attached,
        })
    }

    /// Scrape a page, then normalize, persist, and attach ownership
    ///
    /// The scrape runs before allocation, so a failed scrape persists nothing
    /// and consumes no id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for a malformed URL, the scraper's
    /// `ExternalService*` error, or a validation/store error
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn create_from_url(
        &self,
        ctx: &RequestContext,
        raw_url: &str,
    ) -> AppResult<CreateOutcome> {
        let url = parse_recipe_url(raw_url)?;
        let scraped = self.scraper.scrape(&url).await.map_err(|e| {
            warn!(url = %url, error = %e, "Recipe scrape failed");
            e.with_request_id(ctx.request_id.to_string())
        })?;
        let draft = self.normalizer.normalize_scraped(&scraped, url.as_str())?;
        let recipe = self.allocator.create(draft).await?;
        let owner_attached = self.attach_owner(ctx, recipe.recipe_id).await;

        info!(recipe_id = %recipe.recipe_id, url = %url, owner_attached, "Created recipe from URL");
        Ok(CreateOutcome {
            recipe,
            owner_attached,
        })
    }

    /// Replace a recipe's content, keeping its id and creation time
    ///
    /// An unknown id is created with that id.
    ///
    /// # Errors
    ///
    /// Returns a validation error or the store error
    #[instrument(skip(self, ctx, submission), fields(request_id = %ctx.request_id, recipe_id = %recipe_id))]
    pub async fn edit(
        &self,
        ctx: &RequestContext,
        recipe_id: RecipeId,
        submission: &ManualSubmission,
    ) -> AppResult<Recipe> {
        let existing = self.stores.recipes.find_one(recipe_id).await?;
        let draft = self
            .normalizer
            .normalize_manual(submission)
            .map_err(|e| e.with_resource_id(recipe_id.to_string()))?;

        let now = Utc::now();
        let mut recipe = draft.into_recipe(recipe_id, now);
        if let Some(existing) = &existing {
            recipe.created_at = existing.created_at;
        } else {
            warn!("Edit target does not exist; creating it");
        }
        self.stores.recipes.upsert(recipe).await
    }

    // ================================================================================
    // Relationship operations
    // ================================================================================

    /// Add to the caller's starred set
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` without a user, or the store error
    pub async fn star(
        &self,
        ctx: &RequestContext,
        recipe_id: RecipeId,
    ) -> AppResult<RelationshipAck> {
        self.toggle(ctx, RelationshipKind::Starred, recipe_id, true).await
    }

    /// Remove from the caller's starred set
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` without a user, or the store error
    pub async fn unstar(
        &self,
        ctx: &RequestContext,
        recipe_id: RecipeId,
    ) -> AppResult<RelationshipAck> {
        self.toggle(ctx, RelationshipKind::Starred, recipe_id, false).await
    }

    /// Add to the caller's pinned set
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` without a user, or the store error
    pub async fn pin(
        &self,
        ctx: &RequestContext,
        recipe_id: RecipeId,
    ) -> AppResult<RelationshipAck> {
        self.toggle(ctx, RelationshipKind::Pinned, recipe_id, true).await
    }

    /// Remove from the caller's pinned set
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` without a user, or the store error
    pub async fn unpin(
        &self,
        ctx: &RequestContext,
        recipe_id: RecipeId,
    ) -> AppResult<RelationshipAck> {
        self.toggle(ctx, RelationshipKind::Pinned, recipe_id, false).await
    }

    async fn toggle(
        &self,
        ctx: &RequestContext,
        kind: RelationshipKind,
        recipe_id: RecipeId,
        present: bool,
    ) -> AppResult<RelationshipAck> {
        let user_id = ctx.require_user()?;
        let changed = if present {
            self.stores
                .relationships
                .add(user_id, &[kind], recipe_id)
                .await
        } else {
            self.stores
                .relationships
                .remove(user_id, &[kind], recipe_id)
                .await
        }
        .map_err(|e| {
            e.with_user_id(user_id.as_str())
                .with_resource_id(recipe_id.to_string())
        })?;
        info!(
            request_id = %ctx.request_id,
            user_id = %user_id,
            recipe_id = %recipe_id,
            kind = kind.as_str(),
            present,
            changed,
            "Updated recipe relationship"
        );
        Ok(RelationshipAck {
            recipe_id,
            kind,
            changed,
        })
    }

    /// Drop a recipe from the caller's lists, hiding it if the caller owns it
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` without a user, or the store error
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id, recipe_id = %recipe_id))]
    pub async fn remove(
        &self,
        ctx: &RequestContext,
        recipe_id: RecipeId,
    ) -> AppResult<RemoveOutcome> {
        let user_id = ctx.require_user()?;
        let owns = self
            .stores
            .relationships
            .get(user_id)
            .await?
            .is_some_and(|record| record.contains(RelationshipKind::Owned, recipe_id));

        let hidden = if owns {
            self.stores.recipes.set_hidden(recipe_id, true).await?
        } else {
            false
        };
        self.stores
            .relationships
            .remove(user_id, &RelationshipKind::ALL, recipe_id)
            .await?;

        info!(user_id = %user_id, owner = owns, hidden, "Removed recipe from user lists");
        Ok(RemoveOutcome { recipe_id, hidden })
    }

    /// Administrative delete: remove the record, then prune every user's sets
    ///
    /// # Errors
    ///
    /// Returns the store error from either phase. A phase-two failure leaves
    /// dangling relationship ids behind.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id, recipe_id = %recipe_id))]
    pub async fn hard_delete(
        &self,
        ctx: &RequestContext,
        recipe_id: RecipeId,
    ) -> AppResult<DeleteOutcome> {
        let recipe = self.stores.recipes.delete(recipe_id).await?;
        let pruned_entries = self
            .stores
            .relationships
            .prune_recipe(recipe_id)
            .await
            .map_err(|e| {
                warn!(error = %e, "Recipe deleted but relationship prune failed");
                e.with_resource_id(recipe_id.to_string())
            })?;

        info!(existed = recipe.is_some(), pruned_entries, "Hard-deleted recipe");
        Ok(DeleteOutcome {
            recipe,
            pruned_entries,
        })
    }

    // ================================================================================
    // Per-user views
    // ================================================================================

    /// Summaries of the user's starred recipes, hidden ones included
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on store failure
    pub async fn starred_recipes(&self, user_id: &UserId) -> AppResult<Vec<RecipeSummary>> {
        self.recipes_in_set(user_id, RelationshipKind::Starred).await
    }

    /// Summaries of the user's pinned recipes, hidden ones included
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on store failure
    pub async fn pinned_recipes(&self, user_id: &UserId) -> AppResult<Vec<RecipeSummary>> {
        self.recipes_in_set(user_id, RelationshipKind::Pinned).await
    }

    /// Whether the user starred this recipe
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on store failure
    pub async fn is_starred(&self, user_id: &UserId, recipe_id: RecipeId) -> AppResult<bool> {
        self.in_set(user_id, RelationshipKind::Starred, recipe_id).await
    }

    /// Whether the user pinned this recipe
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on store failure
    pub async fn is_pinned(&self, user_id: &UserId, recipe_id: RecipeId) -> AppResult<bool> {
        self.in_set(user_id, RelationshipKind::Pinned, recipe_id).await
    }

    async fn recipes_in_set(
        &self,
        user_id: &UserId,
        kind: RelationshipKind,
    ) -> AppResult<Vec<RecipeSummary>> {
        let Some(record) = self.stores.relationships.get(user_id).await? else {
            return Ok(Vec::new());
        };
        let ids = record.set(kind);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let recipes = self
            .stores
            .recipes
            .find(&RecipeFilter::by_ids(ids.iter().copied()))
            .await?;
        Ok(recipes.iter().map(Recipe::summary).collect())
    }

    async fn in_set(
        &self,
        user_id: &UserId,
        kind: RelationshipKind,
        recipe_id: RecipeId,
    ) -> AppResult<bool> {
        Ok(self
            .stores
            .relationships
            .get(user_id)
            .await?
            .is_some_and(|record| record.contains(kind, recipe_id)))
    }

    // ================================================================================
    // Reconciliation
    // ================================================================================

    /// Persisted recipes that no user owns
    ///
    /// These appear when the ownership step after a create failed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on store failure
    pub async fn orphaned_recipes(&self) -> AppResult<Vec<RecipeSummary>> {
        let owned = self.stores.relationships.owned_recipe_ids().await?;
        let recipes = self.stores.recipes.find(&RecipeFilter::everything()).await?;
        Ok(recipes
            .iter()
            .filter(|recipe| !owned.contains(&recipe.recipe_id))
            .map(Recipe::summary)
            .collect())
    }

    /// Give an unowned recipe to the caller (owned and starred)
    ///
    /// Returns false when the recipe does not exist or already has an owner.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` without a user, or the store error
    pub async fn claim_orphan(
        &self,
        ctx: &RequestContext,
        recipe_id: RecipeId,
    ) -> AppResult<bool> {
        let user_id = ctx.require_user()?;
        if self.stores.recipes.find_one(recipe_id).await?.is_none() {
            return Ok(false);
        }
        if self
            .stores
            .relationships
            .owned_recipe_ids()
            .await?
            .contains(&recipe_id)
        {
            return Ok(false);
        }
        self.stores
            .relationships
            .add(user_id, &OWNER_SETS, recipe_id)
            .await?;
        info!(
            request_id = %ctx.request_id,
            user_id = %user_id,
            recipe_id = %recipe_id,
            "Claimed orphaned recipe"
        );
        Ok(true)
    }

    /// Remove relationship entries that point at deleted recipes
    ///
    /// Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on store failure
    pub async fn prune_dangling_relationships(&self) -> AppResult<u64> {
        let referenced = self.stores.relationships.referenced_recipe_ids().await?;
        if referenced.is_empty() {
            return Ok(0);
        }
        let existing: Vec<RecipeId> = self
            .stores
            .recipes
            .find(&RecipeFilter::by_ids(referenced.iter().copied()))
            .await?
            .iter()
            .map(|recipe| recipe.recipe_id)
            .collect();

        let mut pruned = 0;
        for recipe_id in referenced.iter().filter(|id| !existing.contains(id)) {
            pruned += self.stores.relationships.prune_recipe(*recipe_id).await?;
        }
        info!(pruned, "Pruned dangling relationship entries");
        Ok(pruned)
    }

    async fn attach_owner(&self, ctx: &RequestContext, recipe_id: RecipeId) -> bool {
        let Some(user_id) = &ctx.user_id else {
            return false;
        };
        match self
            .stores
            .relationships
            .add(user_id, &OWNER_SETS, recipe_id)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    request_id = %ctx.request_id,
                    user_id = %user_id,
                    recipe_id = %recipe_id,
                    error = %e,
                    "Recipe persisted but ownership update failed"
                );
                false
            }
        }
    }
}

fn scraper_from_config(config: &ScraperConfig) -> HttpRecipeScraper {
    HttpRecipeScraper::new(config.endpoint.clone(), config.timeout)
}

/// Parse and check a recipe page URL
///
/// # Errors
///
/// Returns `InvalidFormat` for unparseable URLs or non-HTTP schemes
pub fn parse_recipe_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::invalid_format(format!("invalid recipe URL {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::invalid_format(format!(
            "unsupported URL scheme {other:?}; expected http or https"
        ))
        .with_resource_id(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_parse_recipe_url() {
        assert!(parse_recipe_url(" https://example.com/r/1 ").is_ok());
        assert_eq!(
            parse_recipe_url("not a url").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
        assert_eq!(
            parse_recipe_url("ftp://example.com/r").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
    }
}
