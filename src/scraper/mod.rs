// ABOUTME: Recipe scraper collaborator contract and the HTTP client for the scraping service
// ABOUTME: Defines the loosely-typed scraped record handed to the recipe normalizer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Scraper
//!
//! HTML extraction lives outside this crate. The ingestion flow only sees
//! the [`RecipeScraper`] trait; [`HttpRecipeScraper`] talks to a scraping
//! service that accepts `{"url": ...}` and answers with a [`ScrapedRecipe`].

use crate::constants::service_names;
use crate::errors::{AppError, AppResult};
use crate::normalization::{CategoryInput, ServingsInput};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Free-text times exactly as the page states them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedTime {
    /// Cooking time, e.g. `"45 mins"`
    #[serde(default)]
    pub cook: Option<String>,
    /// Preparation time
    #[serde(default)]
    pub prep: Option<String>,
    /// Total time
    #[serde(default)]
    pub total: Option<String>,
}

/// Raw record returned by the scraping service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedRecipe {
    /// Page title of the recipe
    #[serde(default)]
    pub name: Option<String>,
    /// Category text or tag list
    #[serde(default)]
    pub tag: Option<CategoryInput>,
    /// One string per ingredient line
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// One string per instruction step
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Free-text durations
    #[serde(default)]
    pub time: ScrapedTime,
    /// Serving count or yield prose
    #[serde(default)]
    pub servings: Option<ServingsInput>,
    /// Image reference
    #[serde(default)]
    pub image: Option<String>,
}

/// Scraper collaborator
#[async_trait]
pub trait RecipeScraper: Send + Sync {
    /// Fetch and extract a recipe page
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceError` or `ExternalServiceUnavailable` when the
    /// page cannot be fetched or decoded
    async fn scrape(&self, url: &Url) -> AppResult<ScrapedRecipe>;
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
}

/// Client for an external scraping service
#[derive(Debug, Clone)]
pub struct HttpRecipeScraper {
    client: Client,
    endpoint: Option<Url>,
}

impl HttpRecipeScraper {
    /// Build a client; `None` leaves the scraper unconfigured
    #[must_use]
    pub fn new(endpoint: Option<Url>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to create HTTP client for recipe scraper: {e}, using default");
                Client::new()
            });
        Self { client, endpoint }
    }

    /// Whether a scraping service endpoint is set
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

#[async_trait]
impl RecipeScraper for HttpRecipeScraper {
    #[instrument(skip(self, url), fields(service = service_names::RECIPE_SCRAPER, url = %url))]
    async fn scrape(&self, url: &Url) -> AppResult<ScrapedRecipe> {
        let Some(endpoint) = &self.endpoint else {
            return Err(AppError::external_unavailable(service_names::RECIPE_SCRAPER));
        };

        let response = self
            .client
            .post(endpoint.clone())
            .json(&ScrapeRequest { url: url.as_str() })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::external_service(
                service_names::RECIPE_SCRAPER,
                format!("scraping service returned status: {status}"),
            )
            .with_resource_id(url.as_str()));
        }

        let scraped: ScrapedRecipe = response.json().await.map_err(|e| {
            AppError::external_service(
                service_names::RECIPE_SCRAPER,
                format!("failed to decode scraped recipe: {e}"),
            )
            .with_source(e)
        })?;
        debug!(
            ingredients = scraped.ingredients.len(),
            instructions = scraped.instructions.len(),
            "Scraped recipe page"
        );
        Ok(scraped)
    }
}
