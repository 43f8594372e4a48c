// ABOUTME: Ingredient parser collaborator contract and the default line-based parser
// ABOUTME: Turns newline-separated ingredient text into structured quantity/unit/description entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ingredient Parser
//!
//! The normalizer treats ingredient parsing as a pure function from text to
//! entries and only depends on the [`IngredientParser`] trait. The bundled
//! [`LineIngredientParser`] does best-effort parsing: one entry per
//! non-blank line, a leading quantity (integer, decimal, fraction, mixed
//! number, vulgar fraction, or range), an optional unit, and the rest as the
//! description. Anything it cannot read stays in the description.

use recipe_hub_core::models::IngredientEntry;
use regex::Regex;
use std::sync::LazyLock;

/// Text to structured ingredient entries; synchronous and side-effect free
pub trait IngredientParser: Send + Sync {
    /// Parse a newline-separated ingredient blob
    fn parse(&self, text: &str) -> Vec<IngredientEntry>;
}

/// Leading quantity, optionally followed by a range upper bound.
static QUANTITY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let number = r"(?:\d+\s+\d+/\d+|\d+/\d+|\d+\s*[¼½¾⅓⅔⅛]|[¼½¾⅓⅔⅛]|\d*\.\d+|\d+)";
    Regex::new(&format!(
        r"^(?P<q1>{number})(?:\s*(?:-|–|to)\s*(?P<q2>{number}))?\s*"
    ))
    .ok()
});

/// Units sorted longest first at runtime so `tablespoons` wins over `tb`.
static UNITS_SORTED: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut units = UNITS_RAW.to_vec();
    units.sort_by(|a, b| b.len().cmp(&a.len()));
    units
});

const UNITS_RAW: &[&str] = &[
    // Volume - US
    "fluid ounces",
    "fluid ounce",
    "tablespoons",
    "tablespoon",
    "teaspoons",
    "teaspoon",
    "gallons",
    "gallon",
    "quarts",
    "quart",
    "pints",
    "pint",
    "cups",
    "cup",
    "tbsp",
    "tbs",
    "tsp",
    "fl oz",
    "gal",
    "qt",
    "pt",
    "c",
    // Volume - Metric
    "milliliters",
    "milliliter",
    "liters",
    "liter",
    "litres",
    "litre",
    "ml",
    "l",
    // Weight
    "ounces",
    "ounce",
    "pounds",
    "pound",
    "lbs",
    "lb",
    "oz",
    "kilograms",
    "kilogram",
    "grams",
    "gram",
    "kg",
    "mg",
    "g",
    // Count
    "packages",
    "package",
    "bunches",
    "bunch",
    "pinches",
    "pinch",
    "slices",
    "slice",
    "cloves",
    "clove",
    "sprigs",
    "sprig",
    "sticks",
    "stick",
    "dashes",
    "dash",
    "cans",
    "can",
    "jars",
    "jar",
    "pieces",
    "piece",
];

/// Default one-entry-per-line parser
#[derive(Debug, Clone, Copy, Default)]
pub struct LineIngredientParser;

impl IngredientParser for LineIngredientParser {
    fn parse(&self, text: &str) -> Vec<IngredientEntry> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(parse_line)
            .collect()
    }
}

/// Parse a single ingredient line
#[must_use]
pub fn parse_line(line: &str) -> IngredientEntry {
    let line = line.trim();
    let (quantity, quantity2, rest) = extract_quantity(line);

    if quantity.is_none() && rest.ends_with(':') {
        return IngredientEntry {
            quantity: None,
            quantity2: None,
            unit: None,
            description: rest.trim_end_matches(':').trim().to_owned(),
            is_group_header: true,
        };
    }

    let (unit, description) = extract_unit(rest);
    IngredientEntry {
        quantity,
        quantity2,
        unit,
        description: description.to_owned(),
        is_group_header: false,
    }
}

fn extract_quantity(line: &str) -> (Option<f64>, Option<f64>, &str) {
    let Some(caps) = QUANTITY_PATTERN.as_ref().and_then(|p| p.captures(line)) else {
        return (None, None, line);
    };
    let quantity = caps.name("q1").and_then(|m| parse_number(m.as_str()));
    if quantity.is_none() {
        return (None, None, line);
    }
    let quantity2 = caps.name("q2").and_then(|m| parse_number(m.as_str()));
    let consumed = caps.get(0).map_or(0, |m| m.end());
    (quantity, quantity2, line[consumed..].trim_start())
}

fn vulgar_fraction(c: char) -> Option<f64> {
    match c {
        '¼' => Some(0.25),
        '½' => Some(0.5),
        '¾' => Some(0.75),
        '⅓' => Some(1.0 / 3.0),
        '⅔' => Some(2.0 / 3.0),
        '⅛' => Some(0.125),
        _ => None,
    }
}

fn parse_fraction(s: &str) -> Option<f64> {
    let (num, den) = s.split_once('/')?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    if den == 0.0 {
        return None;
    }
    Some(num / den)
}

/// Parse `2`, `2.5`, `.5`, `1/2`, `1 1/2`, `½`, `1½`
fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if let Some(last) = raw.chars().last() {
        if let Some(fraction) = vulgar_fraction(last) {
            let whole = raw[..raw.len() - last.len_utf8()].trim();
            let whole: f64 = if whole.is_empty() { 0.0 } else { whole.parse().ok()? };
            return Some(whole + fraction);
        }
    }
    if let Some((whole, fraction)) = raw.split_once(char::is_whitespace) {
        let whole: f64 = whole.parse().ok()?;
        return Some(whole + parse_fraction(fraction)?);
    }
    if raw.contains('/') {
        return parse_fraction(raw);
    }
    raw.parse().ok()
}

fn extract_unit(rest: &str) -> (Option<String>, &str) {
    let lower = rest.to_lowercase();
    for &unit in UNITS_SORTED.iter() {
        if !lower.starts_with(unit) || rest.len() < unit.len() || !rest.is_char_boundary(unit.len())
        {
            continue;
        }
        let after = &rest[unit.len()..];
        if after.is_empty() || after.starts_with(|c: char| c.is_whitespace() || c == '.' || c == ',')
        {
            let remaining = after.trim_start_matches(['.', ',']).trim();
            return (Some(unit.to_owned()), remaining);
        }
    }
    (None, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_ingredient() {
        let entry = parse_line("2 cups flour");
        assert_eq!(entry.quantity, Some(2.0));
        assert_eq!(entry.unit.as_deref(), Some("cups"));
        assert_eq!(entry.description, "flour");
    }

    #[test]
    fn test_fractions_and_mixed_numbers() {
        assert_eq!(parse_line("1/2 cup sugar").quantity, Some(0.5));
        assert_eq!(parse_line("1 1/2 cups water").quantity, Some(1.5));
        assert_eq!(parse_line("½ tsp salt").quantity, Some(0.5));
        assert_eq!(parse_line("1½ tsp salt").quantity, Some(1.5));
        assert_eq!(parse_line(".25 oz yeast").quantity, Some(0.25));
    }

    #[test]
    fn test_range_quantity() {
        let entry = parse_line("2-3 cloves garlic");
        assert_eq!(entry.quantity, Some(2.0));
        assert_eq!(entry.quantity2, Some(3.0));
        assert_eq!(entry.unit.as_deref(), Some("cloves"));
        assert_eq!(entry.description, "garlic");
    }

    #[test]
    fn test_no_quantity_or_unit() {
        let entry = parse_line("salt to taste");
        assert_eq!(entry.quantity, None);
        assert_eq!(entry.unit, None);
        assert_eq!(entry.description, "salt to taste");

        let entry = parse_line("3 eggs");
        assert_eq!(entry.quantity, Some(3.0));
        assert_eq!(entry.unit, None);
        assert_eq!(entry.description, "eggs");
    }

    #[test]
    fn test_unit_requires_word_boundary() {
        let entry = parse_line("2 carrots");
        assert_eq!(entry.unit, None);
        assert_eq!(entry.description, "carrots");
    }

    #[test]
    fn test_group_header() {
        let entry = parse_line("For the sauce:");
        assert!(entry.is_group_header);
        assert_eq!(entry.description, "For the sauce");
    }

    #[test]
    fn test_blob_skips_blank_lines() {
        let entries = LineIngredientParser.parse("2 cups flour\n\n  \n1 tbsp olive oil\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].unit.as_deref(), Some("tbsp"));
        assert_eq!(entries[1].description, "olive oil");
    }
}
