// ABOUTME: Database configuration types for the recipe and relationship stores
// ABOUTME: Parses DATABASE_URL into an on-disk SQLite, in-memory SQLite, or in-process backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{defaults, env_keys};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::time::Duration;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (`sqlite::memory:`)
    Memory,
    /// No database at all; records live in process memory (`memory://`)
    InProcess,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns a config error for blank or unsupported URLs
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::config("DATABASE_URL must not be empty"));
        }
        if s == "memory://" {
            return Ok(Self::InProcess);
        }
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.strip_prefix("//").unwrap_or(path_str);
            return if path_str == ":memory:" {
                Ok(Self::Memory)
            } else if path_str.is_empty() {
                Err(AppError::config("sqlite URL is missing a file path"))
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            };
        }
        if s.contains("://") {
            return Err(AppError::config(format!(
                "Unsupported database URL scheme: {s}"
            )));
        }
        // Fallback: treat as SQLite file path
        Ok(Self::SQLite {
            path: PathBuf::from(s),
        })
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
            Self::InProcess => "memory://".into(),
        }
    }

    /// Check if this is an in-memory `SQLite` database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }

    /// Check if this is backed by `SQLite`
    #[must_use]
    pub const fn is_sqlite(&self) -> bool {
        matches!(self, Self::SQLite { .. } | Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from(
                defaults::DATABASE_URL
                    .strip_prefix("sqlite:")
                    .unwrap_or(defaults::DATABASE_URL),
            ),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Store location
    pub url: DatabaseUrl,
    /// How long a `SQLite` writer waits on a locked database
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DatabaseUrl::default(),
            busy_timeout: Duration::from_millis(defaults::SQLITE_BUSY_TIMEOUT_MS),
        }
    }
}

impl DatabaseConfig {
    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if database environment variables are invalid
    pub fn from_env() -> AppResult<Self> {
        let url = match env::var(env_keys::DATABASE_URL) {
            Ok(raw) => DatabaseUrl::parse_url(&raw)?,
            Err(_) => DatabaseUrl::default(),
        };
        let busy_timeout_ms = env_var_or(
            env_keys::SQLITE_BUSY_TIMEOUT_MS,
            &defaults::SQLITE_BUSY_TIMEOUT_MS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            AppError::config(format!(
                "Invalid {} value: {e}",
                env_keys::SQLITE_BUSY_TIMEOUT_MS
            ))
        })?;

        Ok(Self {
            url,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        })
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqlite_urls() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/recipes.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/recipes.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
        assert_eq!(
            DatabaseUrl::parse_url("memory://").unwrap(),
            DatabaseUrl::InProcess
        );
        assert_eq!(
            DatabaseUrl::parse_url("recipes.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("recipes.db")
            }
        );
    }

    #[test]
    fn test_parse_rejects_unsupported_urls() {
        assert!(DatabaseUrl::parse_url("").is_err());
        assert!(DatabaseUrl::parse_url("sqlite:").is_err());
        assert!(DatabaseUrl::parse_url("postgres://localhost/recipes").is_err());
    }

    #[test]
    fn test_connection_string_round_trip() {
        let url = DatabaseUrl::default();
        assert_eq!(url.to_connection_string(), defaults::DATABASE_URL);
        assert!(url.is_sqlite());
        assert!(!url.is_memory());
    }
}
