// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Output formatting helpers for recipe-hub-cli
// ABOUTME: Provides consistent display functions for recipe lists and records

use recipe_hub::{
    errors::AppResult,
    models::{Recipe, RecipeSummary, RecipeTime},
    services::CreateOutcome,
};

fn format_time(time: &RecipeTime) -> String {
    format!(
        "prep {}h{:02}m, cook {}h{:02}m",
        time.prep_hours, time.prep_minutes, time.cook_hours, time.cook_minutes
    )
}

/// Display a table of recipe summaries
pub fn display_summaries(recipes: &[RecipeSummary]) {
    if recipes.is_empty() {
        println!("No recipes found");
        return;
    }
    println!("{:>6}  {:<40}  {:<28}  TAGS", "ID", "NAME", "TIME");
    println!("{}", "=".repeat(90));
    for recipe in recipes {
        println!(
            "{:>6}  {:<40}  {:<28}  {}",
            recipe.recipe_id,
            recipe.name,
            format_time(&recipe.time),
            recipe.category.join(", ")
        );
    }
    println!("\n{} recipe(s)", recipes.len());
}

/// Display a full recipe record as pretty JSON
pub fn display_recipe(recipe: &Recipe) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(recipe)?);
    Ok(())
}

/// Display the result of a create flow
pub fn display_created(outcome: &CreateOutcome) {
    let recipe = &outcome.recipe;
    println!("\nRecipe Created Successfully!");
    println!("{}", "=".repeat(50));
    println!("   Id: {}", recipe.recipe_id);
    println!("   Name: {}", recipe.name);
    println!("   Time: {}", format_time(&recipe.time));
    println!("   Ingredients: {}", recipe.ingredients.len());
    println!("   Directions: {}", recipe.directions.len());
    if let Some(url) = &recipe.url {
        println!("   Source: {url}");
    }
    if !outcome.owner_attached {
        println!("\nWARNING: the recipe has no owner. Pass --user, or claim it later with:");
        println!("   recipe-hub-cli --user <id> orphans claim {}", recipe.recipe_id);
    }
}
