// ABOUTME: Core types and constants for the Recipe Hub ingestion service
// ABOUTME: Foundation crate with error handling, recipe models, and relationship models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipe Hub Core
//!
//! Foundation crate providing shared types and constants for the Recipe Hub
//! ingestion service. This crate changes infrequently, so the main crate and
//! its binaries get incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Duration units, ingestion defaults, and environment variable names
//! - **models**: Canonical recipe records and per-user relationship records

/// Unified error handling system with standard error codes and HTTP status mapping
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Recipe, `RecipeDraft`, `UserRelationship`, ...)
pub mod models;
