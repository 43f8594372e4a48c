// ABOUTME: Loosely-typed submission payload accepted by the manual ingestion flow
// ABOUTME: Lenient number, flag, category, and servings inputs with their coercion rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Category as submitted: a delimited string or an already-split list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryInput {
    /// Passed through unchanged
    List(Vec<String>),
    /// Comma-delimited text such as `"dinner, quick ,vegan"`
    Text(String),
}

/// A flag that may arrive as a bool, number, or form string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagInput {
    /// JSON boolean
    Bool(bool),
    /// Non-zero is true
    Number(f64),
    /// Form value; `""`, `"false"` and `"0"` are false
    Text(String),
}

impl FlagInput {
    /// Coerce to a boolean
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(t) => {
                let t = t.trim();
                !(t.is_empty() || t.eq_ignore_ascii_case("false") || t == "0")
            }
        }
    }
}

/// An integer field that form encoders may send as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntInput {
    /// JSON integer
    Int(i64),
    /// JSON float, truncated toward zero
    Float(f64),
    /// Text holding an integer
    Text(String),
}

impl IntInput {
    /// Read the value; blank text counts as zero
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for text that is not an integer
    pub fn value(&self, field: &str) -> AppResult<i64> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
            Self::Float(_) => Err(AppError::invalid_input(format!("{field} is not a number"))),
            Self::Text(t) if t.trim().is_empty() => Ok(0),
            Self::Text(t) => t.trim().parse().map_err(|_| {
                AppError::invalid_input(format!("{field} must be a whole number, got {t:?}"))
                    .with_details(serde_json::json!({ "field": field }))
            }),
        }
    }
}

/// Serving count as delivered: a number or prose like `"Serves 4"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServingsInput {
    /// Used directly
    Number(f64),
    /// First numeric substring is used
    Text(String),
}

/// Manual recipe submission payload
///
/// Field names follow the form the web client posts; the short time names
/// (`prepHour`, `cookMin`, ...) are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualSubmission {
    /// Required display name
    #[serde(default)]
    pub name: Option<String>,
    /// Delimited text or list
    #[serde(default)]
    pub category: Option<CategoryInput>,
    /// Newline-separated ingredient lines
    #[serde(default)]
    pub ingredients: Option<String>,
    /// Newline-separated direction lines
    #[serde(default)]
    pub directions: Option<String>,
    /// Soft-delete flag
    #[serde(default)]
    pub hidden: Option<FlagInput>,
    /// Preparation hours
    #[serde(default, alias = "prepHour")]
    pub prep_hours: Option<IntInput>,
    /// Preparation minutes
    #[serde(default, alias = "prepMin")]
    pub prep_minutes: Option<IntInput>,
    /// Cooking hours
    #[serde(default, alias = "cookHour")]
    pub cook_hours: Option<IntInput>,
    /// Cooking minutes
    #[serde(default, alias = "cookMin")]
    pub cook_minutes: Option<IntInput>,
    /// Optional rating
    #[serde(default)]
    pub rating: Option<f64>,
    /// Source reference
    #[serde(default)]
    pub url: Option<String>,
    /// Image reference (upload handled elsewhere)
    #[serde(default)]
    pub image_url: Option<String>,
    /// Serving count
    #[serde(default)]
    pub serving_size: Option<ServingsInput>,
}
