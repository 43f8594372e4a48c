// ABOUTME: Canonical recipe record, draft, listing summary, and identifier types
// ABOUTME: Wire names are camelCase to match the stored document shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically assigned recipe identifier
///
/// Relationship sets and route parameters historically carried ids as either
/// strings or numbers. Everything funnels through this type so membership
/// checks compare one canonical representation.
///
/// Values are kept in `1..=i64::MAX` so every id fits a `SQLite` INTEGER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RecipeId(i64);

impl RecipeId {
    /// The id an empty store hands out
    pub const FIRST: Self = Self(defaults::FIRST_RECIPE_ID);

    /// The largest id a store can hold
    pub const MAX: Self = Self(i64::MAX);

    /// Wrap a raw id, rejecting zero and values past [`RecipeId::MAX`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` when the value is out of range
    pub fn new(value: u64) -> AppResult<Self> {
        i64::try_from(value)
            .map_err(|_| out_of_range(value))
            .and_then(Self::from_i64)
    }

    /// Parse a string id (route parameter, legacy relationship entry)
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` when the text is not an integer in range
    pub fn parse(raw: &str) -> AppResult<Self> {
        let value = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| AppError::invalid_format(format!("invalid recipe id: {raw:?}")))?;
        Self::new(value).map_err(|e| e.with_resource_id(raw))
    }

    /// Raw numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// The id after this one
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` once [`RecipeId::MAX`] has been handed out
    pub fn next(self) -> AppResult<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| {
                AppError::invalid_format(format!("recipe id space exhausted at {self}"))
            })
    }

    /// Signed value for `SQLite` INTEGER columns
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Build from a `SQLite` INTEGER column
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for zero or negative values
    pub fn from_i64(value: i64) -> AppResult<Self> {
        if value < 1 {
            return Err(out_of_range(value));
        }
        Ok(Self(value))
    }
}

fn out_of_range(value: impl fmt::Display) -> AppError {
    AppError::invalid_format(format!("recipe id {value} out of range 1..={}", i64::MAX))
}

impl TryFrom<i64> for RecipeId {
    type Error = AppError;

    fn try_from(value: i64) -> AppResult<Self> {
        Self::from_i64(value)
    }
}

impl From<RecipeId> for i64 {
    fn from(id: RecipeId) -> Self {
        id.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which ingestion path produced a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    /// Direct user submission
    Manual,
    /// Third-party page via the scraper collaborator
    Scraped,
}

impl RecipeSource {
    /// Label used in structured logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Scraped => "scraped",
        }
    }
}

/// Preparation and cooking time split
///
/// Fields are signed: a split derived from `total - prep` can go negative
/// when the source page is inconsistent, and that value is kept as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeTime {
    /// Whole preparation hours
    pub prep_hours: i64,
    /// Remaining preparation minutes
    pub prep_minutes: i64,
    /// Whole cooking hours
    pub cook_hours: i64,
    /// Remaining cooking minutes
    pub cook_minutes: i64,
}

/// Vote and rating metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeMeta {
    /// Vote count
    pub votes: u32,
    /// Optional rating copied from the submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Default for RecipeMeta {
    fn default() -> Self {
        Self {
            votes: defaults::INITIAL_VOTES,
            rating: None,
        }
    }
}

/// One structured ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientEntry {
    /// Leading quantity (`1 1/2` becomes 1.5)
    pub quantity: Option<f64>,
    /// Upper bound of a range such as `2-3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity2: Option<f64>,
    /// Unit of measure as written
    pub unit: Option<String>,
    /// Everything after quantity and unit
    pub description: String,
    /// Section header line such as `For the sauce:`
    #[serde(default)]
    pub is_group_header: bool,
}

/// Everything a recipe has except its id
///
/// Produced by the normalizer; the store assigns the id when it persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    /// Display name, never blank
    pub name: String,
    /// Ordered tags
    pub category: Vec<String>,
    /// Structured ingredient entries
    pub ingredients: Vec<IngredientEntry>,
    /// Trimmed, non-empty instruction lines
    pub directions: Vec<String>,
    /// Time split
    pub time: RecipeTime,
    /// Positive serving count when one could be extracted
    pub serving_size: Option<u32>,
    /// Opaque image reference
    pub image_url: Option<String>,
    /// Opaque source reference
    pub url: Option<String>,
    /// Votes and rating
    pub meta: RecipeMeta,
    /// Soft-delete flag
    pub hidden: bool,
}

impl RecipeDraft {
    /// Attach an id and timestamps
    #[must_use]
    pub fn into_recipe(self, recipe_id: RecipeId, now: DateTime<Utc>) -> Recipe {
        Recipe {
            recipe_id,
            name: self.name,
            category: self.category,
            ingredients: self.ingredients,
            directions: self.directions,
            time: self.time,
            serving_size: self.serving_size,
            image_url: self.image_url,
            url: self.url,
            meta: self.meta,
            hidden: self.hidden,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Canonical recipe record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Immutable identifier
    pub recipe_id: RecipeId,
    /// Display name
    pub name: String,
    /// Ordered tags
    pub category: Vec<String>,
    /// Structured ingredient entries
    pub ingredients: Vec<IngredientEntry>,
    /// Instruction lines
    pub directions: Vec<String>,
    /// Time split
    pub time: RecipeTime,
    /// Serving count
    pub serving_size: Option<u32>,
    /// Image reference
    pub image_url: Option<String>,
    /// Source reference
    pub url: Option<String>,
    /// Votes and rating
    pub meta: RecipeMeta,
    /// Excluded from public listing when true
    pub hidden: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Listing projection
    #[must_use]
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            recipe_id: self.recipe_id,
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            meta: self.meta,
            time: self.time,
            category: self.category.clone(),
        }
    }
}

/// Projection returned by listing, search, starred and pinned queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    /// Identifier
    pub recipe_id: RecipeId,
    /// Display name
    pub name: String,
    /// Image reference
    pub image_url: Option<String>,
    /// Votes and rating
    pub meta: RecipeMeta,
    /// Time split
    pub time: RecipeTime,
    /// Tags
    pub category: Vec<String>,
}
