// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory services, a scripted scraper, and submission builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `recipe_hub`

use async_trait::async_trait;
use recipe_hub::{
    database::Stores,
    errors::{AppError, AppResult},
    models::UserId,
    normalization::{CategoryInput, IntInput, ManualSubmission},
    scraper::{RecipeScraper, ScrapedRecipe, ScrapedTime},
    services::{RecipeService, RequestContext},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use url::Url;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        // Another test binary helper may have installed one already
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Scraper double returning a fixed record, or failing every call
pub struct FakeScraper {
    response: Option<ScrapedRecipe>,
    calls: AtomicUsize,
}

impl FakeScraper {
    pub fn returning(recipe: ScrapedRecipe) -> Self {
        Self {
            response: Some(recipe),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeScraper for FakeScraper {
    async fn scrape(&self, url: &Url) -> AppResult<ScrapedRecipe> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().ok_or_else(|| {
            AppError::external_service("recipe scraper", format!("fetch failed for {url}"))
        })
    }
}

/// A typical scraped page
pub fn scraped_pancakes() -> ScrapedRecipe {
    ScrapedRecipe {
        name: Some("Fluffy Pancakes".to_owned()),
        tag: Some(CategoryInput::Text("breakfast, sweet".to_owned())),
        ingredients: vec![
            "1 1/2 cups flour".to_owned(),
            "2 eggs, beaten".to_owned(),
        ],
        instructions: vec!["Mix everything.".to_owned(), "  Fry.  ".to_owned()],
        time: ScrapedTime {
            cook: None,
            prep: Some("10 mins".to_owned()),
            total: Some("1 hr".to_owned()),
        },
        servings: None,
        image: Some("https://img.example.com/pancakes.jpg".to_owned()),
    }
}

/// In-memory service with the given scraper
pub fn memory_service_with(scraper: Arc<dyn RecipeScraper>) -> RecipeService {
    init_test_logging();
    RecipeService::new(Stores::in_memory(), scraper, 5)
}

/// In-memory service whose scraper always fails
pub fn memory_service() -> RecipeService {
    memory_service_with(Arc::new(FakeScraper::failing()))
}

/// Context for a named user
pub fn user_ctx(name: &str) -> RequestContext {
    RequestContext::for_user(UserId::new(name).unwrap())
}

/// Minimal valid manual submission
pub fn submission(name: &str) -> ManualSubmission {
    ManualSubmission {
        name: Some(name.to_owned()),
        category: Some(CategoryInput::Text("dinner".to_owned())),
        ingredients: Some("2 Cups Rice\n1 tsp Salt".to_owned()),
        directions: Some("Boil water.\r\n\r\nAdd rice.".to_owned()),
        prep_minutes: Some(IntInput::Int(15)),
        cook_minutes: Some(IntInput::Text("20".to_owned())),
        ..ManualSubmission::default()
    }
}
