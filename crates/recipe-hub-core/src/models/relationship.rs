// ABOUTME: Per-user relationship record with owned, starred, and pinned recipe sets
// ABOUTME: Set semantics make add and remove idempotent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::recipe::RecipeId;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Opaque user identifier supplied by the authentication collaborator
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identifier, rejecting blank values
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the identifier is empty or whitespace
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("user id must not be blank"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three per-user recipe sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Recipes the user created
    Owned,
    /// Recipes the user saved
    Starred,
    /// Recipes the user pinned to the planner
    Pinned,
}

impl RelationshipKind {
    /// Every kind, in storage order
    pub const ALL: [Self; 3] = [Self::Owned, Self::Starred, Self::Pinned];

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::Starred => "starred",
            Self::Pinned => "pinned",
        }
    }

    /// Parse from database string representation
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for an unknown label
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "owned" => Ok(Self::Owned),
            "starred" => Ok(Self::Starred),
            "pinned" => Ok(Self::Pinned),
            other => Err(AppError::invalid_format(format!(
                "unknown relationship kind: {other}"
            ))),
        }
    }
}

/// One user's relationship record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRelationship {
    /// Owner of the record
    pub user_id: UserId,
    /// Recipes created by this user
    pub recipes_owned: BTreeSet<RecipeId>,
    /// Recipes saved by this user
    pub recipes_starred: BTreeSet<RecipeId>,
    /// Recipes pinned by this user
    pub recipes_pinned: BTreeSet<RecipeId>,
}

impl UserRelationship {
    /// Empty record for a user seen for the first time
    #[must_use]
    pub const fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            recipes_owned: BTreeSet::new(),
            recipes_starred: BTreeSet::new(),
            recipes_pinned: BTreeSet::new(),
        }
    }

    /// Borrow one of the sets
    #[must_use]
    pub const fn set(&self, kind: RelationshipKind) -> &BTreeSet<RecipeId> {
        match kind {
            RelationshipKind::Owned => &self.recipes_owned,
            RelationshipKind::Starred => &self.recipes_starred,
            RelationshipKind::Pinned => &self.recipes_pinned,
        }
    }

    fn set_mut(&mut self, kind: RelationshipKind) -> &mut BTreeSet<RecipeId> {
        match kind {
            RelationshipKind::Owned => &mut self.recipes_owned,
            RelationshipKind::Starred => &mut self.recipes_starred,
            RelationshipKind::Pinned => &mut self.recipes_pinned,
        }
    }

    /// Membership test
    #[must_use]
    pub fn contains(&self, kind: RelationshipKind, recipe_id: RecipeId) -> bool {
        self.set(kind).contains(&recipe_id)
    }

    /// Add-to-set; returns true when the set changed
    pub fn insert(&mut self, kind: RelationshipKind, recipe_id: RecipeId) -> bool {
        self.set_mut(kind).insert(recipe_id)
    }

    /// Pull; returns true when the set changed
    pub fn remove(&mut self, kind: RelationshipKind, recipe_id: RecipeId) -> bool {
        self.set_mut(kind).remove(&recipe_id)
    }

    /// Pull the id from every set; returns how many sets changed
    pub fn remove_everywhere(&mut self, recipe_id: RecipeId) -> u64 {
        RelationshipKind::ALL
            .iter()
            .map(|kind| u64::from(self.remove(*kind, recipe_id)))
            .sum()
    }
}
