// ABOUTME: Recipe read and ingestion commands for recipe-hub-cli
// ABOUTME: Handles list, search, show, JSON import, and URL scraping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use recipe_hub::{
    errors::{AppError, AppResult},
    models::RecipeId,
    normalization::ManualSubmission,
    services::{RecipeService, RequestContext},
};
use std::path::Path;
use tracing::info;

use crate::helpers::display::{display_created, display_recipe, display_summaries};

type Result<T> = AppResult<T>;

/// List every public recipe
pub async fn list(service: &RecipeService) -> Result<()> {
    let recipes = service.list_public().await?;
    display_summaries(&recipes);
    Ok(())
}

/// Search public recipes by name
pub async fn search(service: &RecipeService, keyword: &str) -> Result<()> {
    let recipes = service.search(keyword).await?;
    display_summaries(&recipes);
    Ok(())
}

/// Print one recipe, hidden or not
pub async fn show(service: &RecipeService, recipe_id: &str) -> Result<()> {
    let recipe_id = RecipeId::parse(recipe_id)?;
    let recipe = service
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))?;
    display_recipe(&recipe)
}

/// Create a recipe from a manual submission stored as JSON
pub async fn import(service: &RecipeService, ctx: &RequestContext, file: &Path) -> Result<()> {
    info!("Importing recipe submission from {}", file.display());
    let body = tokio::fs::read_to_string(file).await.map_err(|e| {
        AppError::invalid_input(format!("cannot read {}: {e}", file.display())).with_source(e)
    })?;
    let submission: ManualSubmission = serde_json::from_str(&body)?;

    let outcome = service.create_manual(ctx, &submission).await?;
    display_created(&outcome);
    Ok(())
}

/// Create a recipe by scraping a page
pub async fn scrape(service: &RecipeService, ctx: &RequestContext, url: &str) -> Result<()> {
    info!("Scraping recipe from {url}");
    let outcome = service.create_from_url(ctx, url).await?;
    display_created(&outcome);
    Ok(())
}
