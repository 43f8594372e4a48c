// ABOUTME: Recipe normalizer mapping manual submissions and scraped records onto recipe drafts
// ABOUTME: Category splitting, direction cleanup, serving extraction, and hidden-flag coercion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Normalizer
//!
//! Both ingestion paths end in a [`RecipeDraft`]. Validation happens here,
//! before the caller allocates an id, so a rejected submission never
//! consumes one.

use super::duration::derive_split;
use super::input::{CategoryInput, FlagInput, IntInput, ManualSubmission, ServingsInput};
use crate::errors::{AppError, AppResult};
use crate::ingredients::{IngredientParser, LineIngredientParser};
use crate::scraper::ScrapedRecipe;
use recipe_hub_core::models::{RecipeDraft, RecipeMeta, RecipeSource, RecipeTime};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::debug;

static SERVINGS_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[+-]?(?:\d+(?:\.\d+)?|\.\d+)").ok());

/// Split a category into trimmed, non-empty tags
///
/// Text like `" a, b ,c"` becomes `["a", "b", "c"]`; a list is returned as-is.
#[must_use]
pub fn normalize_category(input: Option<&CategoryInput>) -> Vec<String> {
    match input {
        None => Vec::new(),
        Some(CategoryInput::List(tags)) => tags.clone(),
        Some(CategoryInput::Text(text)) => text
            .replace(", ", ",")
            .replace(" ,", ",")
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect(),
    }
}

/// Split directions into trimmed non-empty lines, dropping carriage returns
#[must_use]
pub fn normalize_directions(text: &str) -> Vec<String> {
    text.replace('\r', "")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Positive whole serving count, if one can be read
#[must_use]
pub fn parse_servings(input: Option<&ServingsInput>) -> Option<u32> {
    let value = match input? {
        ServingsInput::Number(n) => *n,
        ServingsInput::Text(text) => SERVINGS_PATTERN
            .as_ref()?
            .find(text)?
            .as_str()
            .parse::<f64>()
            .ok()?,
    };
    if !value.is_finite() {
        return None;
    }
    let whole = value.trunc();
    if whole < 1.0 || whole > f64::from(u32::MAX) {
        return None;
    }
    Some(whole as u32)
}

/// Interpret the submitted hidden flag; absent is visible
#[must_use]
pub fn coerce_hidden(input: Option<&FlagInput>) -> bool {
    input.is_some_and(FlagInput::is_set)
}

fn time_field(input: Option<&IntInput>, field: &str) -> AppResult<i64> {
    input.map_or(Ok(0), |v| v.value(field))
}

fn required_name(name: Option<&str>) -> AppResult<String> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name.to_owned()),
        _ => Err(AppError::missing_field("name")),
    }
}

/// Maps raw input onto the canonical recipe shape
#[derive(Clone)]
pub struct RecipeNormalizer {
    parser: Arc<dyn IngredientParser>,
}

impl Default for RecipeNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(LineIngredientParser))
    }
}

impl RecipeNormalizer {
    /// Build with a specific ingredient parser
    #[must_use]
    pub fn new(parser: Arc<dyn IngredientParser>) -> Self {
        Self { parser }
    }

    /// Normalize a manual submission
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` when the name is absent or blank, and
    /// `InvalidInput` when a time field is not a whole number
    pub fn normalize_manual(&self, submission: &ManualSubmission) -> AppResult<RecipeDraft> {
        let name = required_name(submission.name.as_deref())?;

        let time = RecipeTime {
            prep_hours: time_field(submission.prep_hours.as_ref(), "prepHours")?,
            prep_minutes: time_field(submission.prep_minutes.as_ref(), "prepMinutes")?,
            cook_hours: time_field(submission.cook_hours.as_ref(), "cookHours")?,
            cook_minutes: time_field(submission.cook_minutes.as_ref(), "cookMinutes")?,
        };

        let ingredients = submission
            .ingredients
            .as_deref()
            .map(|text| self.parser.parse(&text.to_lowercase()))
            .unwrap_or_default();

        let draft = RecipeDraft {
            name,
            category: normalize_category(submission.category.as_ref()),
            ingredients,
            directions: submission
                .directions
                .as_deref()
                .map(normalize_directions)
                .unwrap_or_default(),
            time,
            serving_size: parse_servings(submission.serving_size.as_ref()),
            image_url: submission.image_url.clone(),
            url: submission.url.clone(),
            meta: RecipeMeta {
                rating: submission.rating,
                ..RecipeMeta::default()
            },
            hidden: coerce_hidden(submission.hidden.as_ref()),
        };
        debug!(
            source = RecipeSource::Manual.as_str(),
            ingredients = draft.ingredients.len(),
            directions = draft.directions.len(),
            "Normalized recipe"
        );
        Ok(draft)
    }

    /// Normalize a scraped record
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` when the page yielded no name
    pub fn normalize_scraped(
        &self,
        scraped: &ScrapedRecipe,
        source_url: &str,
    ) -> AppResult<RecipeDraft> {
        let name = required_name(scraped.name.as_deref())
            .map_err(|e| e.with_resource_id(source_url))?;

        let ingredient_text = scraped
            .ingredients
            .iter()
            .map(|line| line.replace(',', ""))
            .collect::<Vec<_>>()
            .join("\n");

        let time = derive_split(
            scraped.time.cook.as_deref(),
            scraped.time.prep.as_deref(),
            scraped.time.total.as_deref(),
        );

        let draft = RecipeDraft {
            name,
            category: normalize_category(scraped.tag.as_ref()),
            ingredients: self.parser.parse(&ingredient_text),
            directions: normalize_directions(&scraped.instructions.join("\n")),
            time,
            serving_size: parse_servings(scraped.servings.as_ref()),
            image_url: scraped.image.clone(),
            url: Some(source_url.to_owned()),
            meta: RecipeMeta::default(),
            hidden: false,
        };
        debug!(
            source = RecipeSource::Scraped.as_str(),
            ingredients = draft.ingredients.len(),
            directions = draft.directions.len(),
            "Normalized recipe"
        );
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::scraper::ScrapedTime;

    #[test]
    fn test_category_text_is_split_and_trimmed() {
        let input = CategoryInput::Text(" a, b ,c".to_owned());
        assert_eq!(normalize_category(Some(&input)), vec!["a", "b", "c"]);

        let input = CategoryInput::Text("dinner,,  ,quick".to_owned());
        assert_eq!(normalize_category(Some(&input)), vec!["dinner", "quick"]);

        assert!(normalize_category(None).is_empty());
    }

    #[test]
    fn test_category_list_passes_through() {
        let input = CategoryInput::List(vec!["Soup ".to_owned(), String::new()]);
        assert_eq!(normalize_category(Some(&input)), vec!["Soup ", ""]);
    }

    #[test]
    fn test_directions_drop_blank_lines() {
        assert_eq!(
            normalize_directions("step1\r\n\r\nstep2  "),
            vec!["step1", "step2"]
        );
        assert!(normalize_directions(" \n\t\n").is_empty());
    }

    #[test]
    fn test_servings_extraction() {
        let text = |s: &str| ServingsInput::Text(s.to_owned());
        assert_eq!(parse_servings(Some(&text("Serves 4"))), Some(4));
        assert_eq!(parse_servings(Some(&text("6.5 portions"))), Some(6));
        assert_eq!(parse_servings(Some(&text("a crowd"))), None);
        assert_eq!(parse_servings(Some(&text("-2"))), None);
        assert_eq!(parse_servings(Some(&ServingsInput::Number(8.0))), Some(8));
        assert_eq!(parse_servings(Some(&ServingsInput::Number(0.0))), None);
        assert_eq!(parse_servings(None), None);
    }

    #[test]
    fn test_hidden_coercion() {
        assert!(!coerce_hidden(None));
        assert!(coerce_hidden(Some(&FlagInput::Text("true".to_owned()))));
        assert!(!coerce_hidden(Some(&FlagInput::Text("0".to_owned()))));
        assert!(coerce_hidden(Some(&FlagInput::Number(1.0))));
    }

    #[test]
    fn test_manual_requires_name() {
        let normalizer = RecipeNormalizer::default();
        let err = normalizer
            .normalize_manual(&ManualSubmission {
                name: Some("   ".to_owned()),
                ..ManualSubmission::default()
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
    }

    #[test]
    fn test_manual_lowercases_ingredients_and_copies_times() {
        let normalizer = RecipeNormalizer::default();
        let draft = normalizer
            .normalize_manual(&ManualSubmission {
                name: Some("Stew".to_owned()),
                ingredients: Some("2 CUPS Stock\nSalt".to_owned()),
                directions: Some("Simmer\n".to_owned()),
                prep_minutes: Some(IntInput::Text("15".to_owned())),
                cook_hours: Some(IntInput::Int(2)),
                rating: Some(4.5),
                ..ManualSubmission::default()
            })
            .unwrap();

        assert_eq!(draft.name, "Stew");
        assert_eq!(draft.ingredients.len(), 2);
        assert_eq!(draft.ingredients[0].unit.as_deref(), Some("cups"));
        assert_eq!(draft.ingredients[0].description, "stock");
        assert_eq!(draft.ingredients[1].description, "salt");
        assert_eq!(draft.time.prep_minutes, 15);
        assert_eq!(draft.time.cook_hours, 2);
        assert_eq!(draft.time.prep_hours, 0);
        assert_eq!(draft.meta.votes, 1);
        assert_eq!(draft.meta.rating, Some(4.5));
        assert!(!draft.hidden);
    }

    #[test]
    fn test_manual_rejects_non_numeric_time() {
        let err = RecipeNormalizer::default()
            .normalize_manual(&ManualSubmission {
                name: Some("Stew".to_owned()),
                cook_minutes: Some(IntInput::Text("a while".to_owned())),
                ..ManualSubmission::default()
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_scraped_strips_commas_and_derives_time() {
        let scraped = ScrapedRecipe {
            name: Some("Pasta".to_owned()),
            tag: Some(CategoryInput::Text("Italian, dinner".to_owned())),
            ingredients: vec!["1,000 g flour".to_owned(), "2 eggs, beaten".to_owned()],
            instructions: vec!["Mix.\r".to_owned(), String::new(), "Knead. ".to_owned()],
            time: ScrapedTime {
                cook: None,
                prep: Some("20 min".to_owned()),
                total: Some("1 hour".to_owned()),
            },
            servings: Some(ServingsInput::Text("Serves 4".to_owned())),
            image: Some("https://img.example/pasta.jpg".to_owned()),
        };

        let draft = RecipeNormalizer::default()
            .normalize_scraped(&scraped, "https://example.com/pasta")
            .unwrap();

        assert_eq!(draft.category, vec!["Italian", "dinner"]);
        assert_eq!(draft.ingredients[0].quantity, Some(1000.0));
        assert_eq!(draft.ingredients[1].description, "eggs beaten");
        assert_eq!(draft.directions, vec!["Mix.", "Knead."]);
        assert_eq!((draft.time.cook_hours, draft.time.cook_minutes), (0, 40));
        assert_eq!(draft.serving_size, Some(4));
        assert_eq!(draft.url.as_deref(), Some("https://example.com/pasta"));
        assert!(!draft.hidden);
    }

    #[test]
    fn test_scraped_without_name_is_rejected() {
        let err = RecipeNormalizer::default()
            .normalize_scraped(&ScrapedRecipe::default(), "https://example.com/x")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
        assert_eq!(
            err.context.resource_id.as_deref(),
            Some("https://example.com/x")
        );
    }
}
