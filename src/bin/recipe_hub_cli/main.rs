// ABOUTME: Recipe Hub CLI - administrative command-line tool for the recipe store
// ABOUTME: Handles listing, import, scraping, hard delete, and orphan/dangling-entry repair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # List public recipes
//! recipe-hub-cli list
//!
//! # Import a manual submission from a JSON file as a user
//! recipe-hub-cli --user cook-42 import ./pancakes.json
//!
//! # Scrape a recipe page
//! recipe-hub-cli --user cook-42 scrape https://example.com/recipes/pancakes
//!
//! # Hard-delete a recipe and prune every user's lists
//! recipe-hub-cli delete 17
//!
//! # Find and claim recipes nobody owns
//! recipe-hub-cli orphans list
//! recipe-hub-cli --user cook-42 orphans claim 17
//!
//! # Remove relationship entries pointing at deleted recipes
//! recipe-hub-cli prune
//! ```

mod commands;
mod helpers;

use clap::{Parser, Subcommand};
use recipe_hub::{
    config::{DatabaseUrl, ServerConfig},
    errors::AppResult,
    logging::LoggingConfig,
    models::UserId,
    services::{RecipeService, RequestContext},
};
use std::path::PathBuf;
use tracing::info;

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "recipe-hub-cli",
    about = "Recipe Hub Management CLI",
    long_about = "Command-line tool for inspecting and repairing the Recipe Hub recipe store."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Act as this user (required for import ownership and orphan claims)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// List public recipes
    List,

    /// Search public recipes by name
    Search {
        /// Case-insensitive keyword
        keyword: String,
    },

    /// Show one recipe as JSON
    Show {
        /// Recipe id
        recipe_id: String,
    },

    /// Create a recipe from a JSON manual submission
    Import {
        /// Path to the submission file
        file: PathBuf,
    },

    /// Create a recipe by scraping a page
    Scrape {
        /// Recipe page URL
        url: String,
    },

    /// Hard-delete a recipe and prune it from every user's lists
    Delete {
        /// Recipe id
        recipe_id: String,
    },

    /// Recipes that no user owns
    Orphans {
        #[command(subcommand)]
        action: OrphanCommand,
    },

    /// Remove relationship entries that point at deleted recipes
    Prune,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum OrphanCommand {
    /// List orphaned recipes
    List,

    /// Give an orphaned recipe to the --user
    Claim {
        /// Recipe id
        recipe_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::for_cli();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = &cli.database_url {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }
    info!(database = %config.database.url, "Recipe Hub CLI");

    let service = RecipeService::from_config(&config).await?;
    let ctx = match cli.user {
        Some(raw) => RequestContext::for_user(UserId::new(raw)?),
        None => RequestContext::anonymous(),
    };

    match cli.command {
        Command::List => commands::recipes::list(&service).await?,
        Command::Search { keyword } => commands::recipes::search(&service, &keyword).await?,
        Command::Show { recipe_id } => commands::recipes::show(&service, &recipe_id).await?,
        Command::Import { file } => commands::recipes::import(&service, &ctx, &file).await?,
        Command::Scrape { url } => commands::recipes::scrape(&service, &ctx, &url).await?,
        Command::Delete { recipe_id } => {
            commands::maintenance::delete(&service, &ctx, &recipe_id).await?;
        }
        Command::Orphans { action } => match action {
            OrphanCommand::List => commands::maintenance::list_orphans(&service).await?,
            OrphanCommand::Claim { recipe_id } => {
                commands::maintenance::claim(&service, &ctx, &recipe_id).await?;
            }
        },
        Command::Prune => commands::maintenance::prune(&service).await?,
    }

    Ok(())
}
