// ABOUTME: Configuration management module for centralized service settings
// ABOUTME: Environment-driven settings for the stores, the scraper client, and ingestion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Database URL parsing and store settings
pub mod database;
/// Environment and server configuration
pub mod environment;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::{Environment, IngestionConfig, ScraperConfig, ServerConfig};
