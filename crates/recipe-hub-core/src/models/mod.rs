// ABOUTME: Core data models for recipes and per-user recipe relationships
// ABOUTME: Re-exports the recipe record types and the relationship record types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain models shared by the stores, the normalizers, and the service layer.

/// Recipe record, draft, summary, and identifier
pub mod recipe;

/// User relationship record and set kinds
pub mod relationship;

pub use recipe::{
    IngredientEntry, Recipe, RecipeDraft, RecipeId, RecipeMeta, RecipeSource, RecipeSummary,
    RecipeTime,
};
pub use relationship::{RelationshipKind, UserId, UserRelationship};
