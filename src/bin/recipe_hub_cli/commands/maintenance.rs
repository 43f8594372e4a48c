// ABOUTME: Maintenance commands for recipe-hub-cli
// ABOUTME: Handles hard delete, orphan listing and claiming, and dangling-entry pruning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use recipe_hub::{
    errors::AppResult,
    models::RecipeId,
    services::{RecipeService, RequestContext},
};
use tracing::warn;

use crate::helpers::display::display_summaries;

type Result<T> = AppResult<T>;

/// Hard-delete a recipe and prune it from all users
pub async fn delete(service: &RecipeService, ctx: &RequestContext, recipe_id: &str) -> Result<()> {
    let recipe_id = RecipeId::parse(recipe_id)?;
    let outcome = service.hard_delete(ctx, recipe_id).await?;

    match &outcome.recipe {
        Some(recipe) => println!("Deleted recipe {} ({})", recipe.recipe_id, recipe.name),
        None => {
            warn!(recipe_id = %recipe_id, "Recipe was already gone");
            println!("Recipe {recipe_id} did not exist");
        }
    }
    println!("Pruned {} relationship entries", outcome.pruned_entries);
    Ok(())
}

/// List recipes nobody owns
pub async fn list_orphans(service: &RecipeService) -> Result<()> {
    let orphans = service.orphaned_recipes().await?;
    if orphans.is_empty() {
        println!("No orphaned recipes");
        return Ok(());
    }
    display_summaries(&orphans);
    Ok(())
}

/// Give an orphaned recipe to the acting user
pub async fn claim(service: &RecipeService, ctx: &RequestContext, recipe_id: &str) -> Result<()> {
    let recipe_id = RecipeId::parse(recipe_id)?;
    if service.claim_orphan(ctx, recipe_id).await? {
        println!("Claimed recipe {recipe_id}");
    } else {
        println!("Recipe {recipe_id} does not exist or already has an owner");
    }
    Ok(())
}

/// Remove relationship entries for deleted recipes
pub async fn prune(service: &RecipeService) -> Result<()> {
    let pruned = service.prune_dangling_relationships().await?;
    println!("Pruned {pruned} dangling relationship entries");
    Ok(())
}
