// ABOUTME: Constants module with domain-separated organization for Recipe Hub
// ABOUTME: Duration unit factors, ingestion defaults, service names, and env var keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than collected in a single flat list.

/// Millisecond factors for the free-text duration units
pub mod duration_units {
    /// One second
    pub const SECOND_MS: u64 = 1_000;
    /// One minute (`min`, `mins`, `minute`, `minutes`)
    pub const MINUTE_MS: u64 = 60 * SECOND_MS;
    /// One hour (`hr`, `hrs`, `hour`, `hours`)
    pub const HOUR_MS: u64 = 60 * MINUTE_MS;

    /// Map a matched unit word to its millisecond factor
    #[must_use]
    pub fn unit_to_ms(unit: &str) -> u64 {
        match unit.to_ascii_lowercase().as_str() {
            "second" => SECOND_MS,
            "min" | "mins" | "minute" | "minutes" => MINUTE_MS,
            "hr" | "hrs" | "hour" | "hours" => HOUR_MS,
            _ => 0,
        }
    }
}

/// Defaults applied by the ingestion pipeline
pub mod defaults {
    /// Vote count every new or edited recipe starts with
    pub const INITIAL_VOTES: u32 = 1;
    /// First id handed out by an empty store
    pub const FIRST_RECIPE_ID: i64 = 1;
    /// Retry cap for id allocation conflicts
    pub const ID_ALLOCATION_MAX_RETRIES: u32 = 5;
    /// Base pause between allocation retries in milliseconds
    pub const ID_ALLOCATION_RETRY_BASE_MS: u64 = 5;
    /// Scraper request timeout in seconds
    pub const SCRAPER_TIMEOUT_SECS: u64 = 30;
    /// `SQLite` busy timeout in milliseconds
    pub const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;
    /// Default on-disk database location
    pub const DATABASE_URL: &str = "sqlite:./data/recipes.db";
}

/// Service identifiers used in logs and error messages
pub mod service_names {
    /// Main service name
    pub const RECIPE_HUB: &str = "recipe-hub";
    /// Scraper collaborator name
    pub const RECIPE_SCRAPER: &str = "recipe scraper";
}

/// Environment variable names read by the configuration layer
pub mod env_keys {
    /// Database connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Scraper service endpoint
    pub const RECIPE_SCRAPER_URL: &str = "RECIPE_SCRAPER_URL";
    /// Scraper request timeout
    pub const SCRAPER_TIMEOUT_SECS: &str = "SCRAPER_TIMEOUT_SECS";
    /// Allocation retry cap
    pub const ID_ALLOCATION_MAX_RETRIES: &str = "ID_ALLOCATION_MAX_RETRIES";
    /// `SQLite` busy timeout
    pub const SQLITE_BUSY_TIMEOUT_MS: &str = "SQLITE_BUSY_TIMEOUT_MS";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}
