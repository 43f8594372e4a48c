// ABOUTME: Monotonic recipe id allocation on top of the recipe store
// ABOUTME: Bounded retry with jittered backoff when concurrent inserts collide on a key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::defaults;
use crate::database::RecipeStore;
use crate::errors::{AppError, AppResult, ErrorCode};
use rand::Rng;
use recipe_hub_core::models::{Recipe, RecipeDraft, RecipeId};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Assigns ids of the form `max(ids ever used) + 1`
#[derive(Clone)]
pub struct IdAllocator {
    store: Arc<dyn RecipeStore>,
    max_retries: u32,
}

impl IdAllocator {
    /// Create an allocator over a recipe store
    #[must_use]
    pub fn new(store: Arc<dyn RecipeStore>, max_retries: u32) -> Self {
        Self { store, max_retries }
    }

    /// The id the next create would receive if nothing else writes first
    ///
    /// Hidden and hard-deleted ids count as used.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the store cannot be read, or
    /// `InvalidFormat` once the id space is used up
    pub async fn next_id(&self) -> AppResult<RecipeId> {
        self.store
            .max_recipe_id()
            .await?
            .map_or(Ok(RecipeId::FIRST), RecipeId::next)
    }

    /// Assign an id and persist the draft in one store step
    ///
    /// Key conflicts and lock timeouts are retried up to `max_retries` times.
    ///
    /// # Errors
    ///
    /// Returns the last store error once retries are exhausted, or any
    /// non-retryable store error immediately
    pub async fn create(&self, draft: RecipeDraft) -> AppResult<Recipe> {
        let mut attempts = 0;
        loop {
            match self.store.insert_next(draft.clone()).await {
                Ok(recipe) => {
                    debug!(recipe_id = %recipe.recipe_id, attempts, "Allocated recipe id");
                    return Ok(recipe);
                }
                Err(e) if is_retryable(&e) && attempts < self.max_retries => {
                    attempts += 1;
                    let backoff_ms = defaults::ID_ALLOCATION_RETRY_BASE_MS * (1 << attempts.min(6))
                        + rand::thread_rng().gen_range(0..defaults::ID_ALLOCATION_RETRY_BASE_MS);
                    warn!(
                        attempt = attempts,
                        max_retries = self.max_retries,
                        backoff_ms,
                        error = %e,
                        "Recipe id allocation collided, retrying"
                    );
                    sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => {
                    error!(attempts, error = %e, "Recipe id allocation failed");
                    return Err(e);
                }
            }
        }
    }
}

fn is_retryable(error: &AppError) -> bool {
    match error.code {
        ErrorCode::ResourceAlreadyExists => true,
        ErrorCode::DatabaseError => {
            let message = error.message.to_lowercase();
            message.contains("database is locked") || message.contains("busy")
        }
        _ => false,
    }
}
