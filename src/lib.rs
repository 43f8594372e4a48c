// ABOUTME: Main library entry point for the Recipe Hub ingestion service
// ABOUTME: Recipe normalization, scraping, storage, and per-user recipe relationships
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipe Hub
//!
//! Ingests recipes from two sources, a manual submission form and a remote
//! scraping service, normalizes both into one canonical record, assigns
//! monotonic integer ids, and tracks which recipes each user owns, stars,
//! and pins.
//!
//! ## Architecture
//!
//! - **Normalization**: duration parsing, ingredient parsing, and field coercion
//! - **Scraper**: client for the external recipe scraping service
//! - **Database**: recipe and relationship stores (in-memory and `SQLite`)
//! - **Services**: id allocation and the ingestion orchestrator
//! - **Config**: environment-driven configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use recipe_hub::config::ServerConfig;
//! use recipe_hub::errors::AppResult;
//! use recipe_hub::services::{RecipeService, RequestContext};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let service = RecipeService::from_config(&config).await?;
//!
//!     for recipe in service.list_public().await? {
//!         println!("{} {}", recipe.recipe_id, recipe.name);
//!     }
//!     let _ctx = RequestContext::anonymous();
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Application constants
pub mod constants;

/// Recipe and relationship persistence
pub mod database;

/// Unified error handling
pub mod errors;

/// Ingredient line parsing
pub mod ingredients;

/// Structured logging setup
pub mod logging;

/// Field normalization for manual and scraped recipes
pub mod normalization;

/// External recipe scraping service client
pub mod scraper;

/// Ingestion orchestration and relationship operations
pub mod services;

/// Canonical recipe and relationship models
pub mod models {
    pub use recipe_hub_core::models::*;
}
