// ABOUTME: Domain service layer for recipe ingestion and user relationships
// ABOUTME: Request context, id allocation, and the orchestrator that sequences both stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Protocol-agnostic business logic. The excluded HTTP router and the admin
//! CLI both call into [`RecipeService`].

/// Per-call identity and correlation
pub mod context;

/// Monotonic id allocation with bounded retry
pub mod id_allocator;

/// Ingestion flows and relationship operations
pub mod ingestion;

pub use context::RequestContext;
pub use id_allocator::IdAllocator;
pub use ingestion::{
    parse_recipe_url, CreateOutcome, DeleteOutcome, RecipeService, RelationshipAck, RemoveOutcome,
};
