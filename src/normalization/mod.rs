// ABOUTME: Normalization pipeline turning manual and scraped input into canonical recipe drafts
// ABOUTME: Groups the duration parser, submission input types, and the recipe normalizer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Free-text duration parsing and prep/cook derivation
pub mod duration;

/// Manual submission payload and lenient field types
pub mod input;

/// Recipe normalizer for both ingestion paths
pub mod recipe;

pub use duration::{derive_split, parse_duration, TimeSpan};
pub use input::{CategoryInput, FlagInput, IntInput, ManualSubmission, ServingsInput};
pub use recipe::{
    coerce_hidden, normalize_category, normalize_directions, parse_servings, RecipeNormalizer,
};
