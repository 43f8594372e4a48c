// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Loads database, scraper, and id allocation settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use super::database::DatabaseConfig;
use crate::constants::{defaults, env_keys};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Scraping service client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Service endpoint; scrape-create is unavailable without one
    pub endpoint: Option<Url>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(defaults::SCRAPER_TIMEOUT_SECS),
        }
    }
}

/// Ingestion pipeline settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Retry cap for duplicate-key conflicts during id allocation
    pub id_allocation_max_retries: u32,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            id_allocation_max_retries: defaults::ID_ALLOCATION_MAX_RETRIES,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Store settings
    pub database: DatabaseConfig,
    /// Scraper client settings
    pub scraper: ScraperConfig,
    /// Ingestion settings
    pub ingestion: IngestionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error when a variable is set to an unparseable value
    pub fn from_env() -> AppResult<Self> {
        let environment = Environment::from_str_or_default(&env_var_or(
            env_keys::ENVIRONMENT,
            "development",
        ));

        let endpoint = match env::var(env_keys::RECIPE_SCRAPER_URL) {
            Ok(raw) if !raw.trim().is_empty() => Some(Url::parse(raw.trim()).map_err(|e| {
                AppError::config(format!("Invalid {} value: {e}", env_keys::RECIPE_SCRAPER_URL))
            })?),
            _ => None,
        };

        let config = Self {
            environment,
            database: DatabaseConfig::from_env()?,
            scraper: ScraperConfig {
                endpoint,
                timeout: Duration::from_secs(parse_env(
                    env_keys::SCRAPER_TIMEOUT_SECS,
                    defaults::SCRAPER_TIMEOUT_SECS,
                )?),
            },
            ingestion: IngestionConfig {
                id_allocation_max_retries: parse_env(
                    env_keys::ID_ALLOCATION_MAX_RETRIES,
                    defaults::ID_ALLOCATION_MAX_RETRIES,
                )?,
            },
        };

        info!(
            environment = %config.environment,
            database = %config.database.url,
            scraper_configured = config.scraper.endpoint.is_some(),
            "Loaded configuration from environment"
        );
        Ok(config)
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value: {e}"))),
        Err(_) => Ok(default),
    }
}
