// ABOUTME: Free-text duration parsing ("1 hr 30 mins") into whole hours and minutes
// ABOUTME: Derives missing cook or prep splits from a total when the page omits one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Duration Normalizer
//!
//! Scraped pages describe times as prose: `"1 hour 30 mins"`, `"PT20M"`,
//! `"about 45 minutes"`. [`parse_duration`] sums every `<number> <unit>`
//! pair it can find and ignores the rest, so unparseable input is a zero
//! span rather than an error.

use crate::constants::duration_units::{unit_to_ms, HOUR_MS, MINUTE_MS};
use recipe_hub_core::models::RecipeTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Sub;
use std::sync::LazyLock;

/// `<digits> <unit>` pairs; the alternation order mirrors the unit table.
static DURATION_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(second|min|mins|minute|minutes|hr|hours|hour|hrs)").ok()
});

/// Whole hours plus remaining whole minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Whole hours
    pub hours: i64,
    /// Remaining minutes
    pub minutes: i64,
}

impl TimeSpan {
    /// The zero span returned for empty or unparseable text
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
    };

    /// Split a millisecond total; leftover seconds are truncated
    #[must_use]
    pub fn from_millis(total_ms: u64) -> Self {
        let hours = total_ms / HOUR_MS;
        let minutes = (total_ms % HOUR_MS) / MINUTE_MS;
        Self {
            hours: i64::try_from(hours).unwrap_or(i64::MAX),
            minutes: i64::try_from(minutes).unwrap_or(0),
        }
    }

    /// Span length in minutes
    #[must_use]
    pub const fn total_minutes(self) -> i64 {
        self.hours * 60 + self.minutes
    }

    /// Re-split a minute count; a negative count keeps its sign in both parts
    #[must_use]
    pub const fn from_minutes(total: i64) -> Self {
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }
}

/// Difference with minute borrowing (`1h 0m - 0h 20m` is `0h 40m`).
/// A negative difference is not clamped.
impl Sub for TimeSpan {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_minutes(self.total_minutes() - rhs.total_minutes())
    }
}

/// Parse a free-text time span
///
/// Every `<number> <unit>` occurrence is accumulated; text that matches no
/// unit contributes nothing. No match at all yields [`TimeSpan::ZERO`].
#[must_use]
pub fn parse_duration(text: &str) -> TimeSpan {
    let Some(pattern) = DURATION_PATTERN.as_ref() else {
        return TimeSpan::ZERO;
    };

    let mut matched = false;
    let mut total_ms: u64 = 0;
    for caps in pattern.captures_iter(text) {
        let (Some(amount), Some(unit)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        // Digit runs too long for u64 saturate instead of failing the parse.
        let amount = amount.as_str().parse::<u64>().unwrap_or(u64::MAX);
        total_ms = total_ms.saturating_add(amount.saturating_mul(unit_to_ms(unit.as_str())));
        matched = true;
    }

    if matched {
        TimeSpan::from_millis(total_ms)
    } else {
        TimeSpan::ZERO
    }
}

fn present(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

fn derive_side(direct: Option<&str>, total: Option<&str>, other: Option<&str>) -> TimeSpan {
    if let Some(direct) = direct {
        return parse_duration(direct);
    }
    match (total, other) {
        (Some(total), Some(other)) => parse_duration(total) - parse_duration(other),
        _ => TimeSpan::ZERO,
    }
}

/// Build a prep/cook split from the scraper's free-text fields
///
/// A side given directly is parsed as-is. A missing side is `total` minus the
/// other side when both of those exist, otherwise zero. Blank strings count
/// as missing. Negative results (other side longer than total) are kept.
#[must_use]
pub fn derive_split(cook: Option<&str>, prep: Option<&str>, total: Option<&str>) -> RecipeTime {
    let (cook, prep, total) = (present(cook), present(prep), present(total));

    let cook_span = derive_side(cook, total, prep);
    let prep_span = derive_side(prep, total, cook);

    RecipeTime {
        prep_hours: prep_span.hours,
        prep_minutes: prep_span.minutes,
        cook_hours: cook_span.hours,
        cook_minutes: cook_span.minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(hours: i64, minutes: i64) -> TimeSpan {
        TimeSpan { hours, minutes }
    }

    #[test]
    fn test_parse_hours_and_minutes() {
        assert_eq!(parse_duration("1 hour 30 mins"), span(1, 30));
        assert_eq!(parse_duration("1 hr 5 minutes"), span(1, 5));
        assert_eq!(parse_duration("90 minutes"), span(1, 30));
        assert_eq!(parse_duration("2hrs"), span(2, 0));
    }

    #[test]
    fn test_parse_unmatched_text_is_zero() {
        assert_eq!(parse_duration("nonsense"), TimeSpan::ZERO);
        assert_eq!(parse_duration(""), TimeSpan::ZERO);
        assert_eq!(parse_duration("PT20M"), TimeSpan::ZERO);
    }

    #[test]
    fn test_parse_truncates_seconds() {
        assert_eq!(parse_duration("90 second"), span(0, 1));
        assert_eq!(parse_duration("59 second"), span(0, 0));
    }

    #[test]
    fn test_parse_ignores_surrounding_words() {
        assert_eq!(parse_duration("about 45 Minutes, give or take"), span(0, 45));
    }

    #[test]
    fn test_derive_cook_from_total_and_prep() {
        let time = derive_split(None, Some("20 min"), Some("1 hour"));
        assert_eq!((time.cook_hours, time.cook_minutes), (0, 40));
        assert_eq!((time.prep_hours, time.prep_minutes), (0, 20));
    }

    #[test]
    fn test_derive_keeps_negative_differences() {
        let time = derive_split(Some("1 hour 30 mins"), None, Some("1 hour"));
        assert_eq!((time.prep_hours, time.prep_minutes), (0, -30));

        let time = derive_split(Some("3 hours"), None, Some("1 hour"));
        assert_eq!((time.prep_hours, time.prep_minutes), (-2, 0));
    }

    #[test]
    fn test_derive_prefers_direct_values() {
        let time = derive_split(Some("35 mins"), Some("10 mins"), Some("3 hours"));
        assert_eq!((time.cook_hours, time.cook_minutes), (0, 35));
        assert_eq!((time.prep_hours, time.prep_minutes), (0, 10));
    }

    #[test]
    fn test_derive_missing_everything_is_zero() {
        assert_eq!(derive_split(None, None, None), RecipeTime::default());
        assert_eq!(derive_split(Some("  "), None, Some("1 hour")), RecipeTime::default());
    }
}
