//! Column quality assessment.
//!
//! Produces the four quality ratios (completeness, consistency, validity,
//! uniqueness) and the weighted quality score for a column. This is a pure
//! function of the column's values, name, and semantic type.
//!
//! Sub-metrics without an explicit rule for the column's semantic type
//! default to 1.0. That inflates scores for most columns and is preserved
//! deliberately: the recommendation thresholds downstream were calibrated
//! against this baseline.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::models::{coerce_numeric, comparable_key, round3};

use super::models::QualityBreakdown;
use super::semantic::SemanticType;

/// Fixed score weights. These are policy constants, not tunables; changing
/// them changes the meaning of every stored score.
const COMPLETENESS_WEIGHT: f64 = 0.30;
const CONSISTENCY_WEIGHT: f64 = 0.25;
const VALIDITY_WEIGHT: f64 = 0.25;
const UNIQUENESS_WEIGHT: f64 = 0.20;

/// Column names whose financial amounts must be non-negative.
const NON_NEGATIVE_AMOUNT_COLUMNS: &[&str] = &["price", "cost", "fee"];

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("hard-coded email pattern compiles")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\+?1?-?\d{3}-?\d{3}-?\d{4}$").expect("hard-coded phone pattern compiles")
    })
}

/// Assesses the four quality ratios for a column.
///
/// `values` must cover every row (nulls included); `column_name` is used for
/// the non-negative amount rule.
pub fn assess_column(
    values: &[&serde_json::Value],
    column_name: &str,
    semantic_type: SemanticType,
) -> QualityBreakdown {
    let total = values.len();
    let non_null: Vec<&serde_json::Value> = values.iter().copied().filter(|v| !v.is_null()).collect();
    let null_count = total - non_null.len();

    let completeness = if total == 0 {
        1.0
    } else {
        1.0 - null_count as f64 / total as f64
    };

    let mut consistency = 1.0;
    let mut validity = 1.0;
    let mut uniqueness = 1.0;

    if !non_null.is_empty() {
        match semantic_type {
            SemanticType::PiiEmail => {
                consistency = matching_fraction(&non_null, email_pattern());
            }
            SemanticType::PiiPhone => {
                consistency = matching_fraction(&non_null, phone_pattern());
            }
            SemanticType::FinancialAmount => {
                if NON_NEGATIVE_AMOUNT_COLUMNS.contains(&column_name.to_lowercase().as_str()) {
                    let non_negative = non_null
                        .iter()
                        .filter(|v| coerce_numeric(v).is_some_and(|n| n >= 0.0))
                        .count();
                    validity = non_negative as f64 / non_null.len() as f64;
                }
            }
            _ => {}
        }

        if matches!(semantic_type, SemanticType::Identifier | SemanticType::PiiEmail) {
            uniqueness = distinct_count(&non_null) as f64 / non_null.len() as f64;
        }
    }

    QualityBreakdown {
        completeness: round3(completeness),
        consistency: round3(consistency),
        validity: round3(validity),
        uniqueness: round3(uniqueness),
    }
}

impl QualityBreakdown {
    /// Weighted quality score in [0, 1], rounded to 3 decimals.
    pub fn score(&self) -> f64 {
        round3(
            self.completeness * COMPLETENESS_WEIGHT
                + self.consistency * CONSISTENCY_WEIGHT
                + self.validity * VALIDITY_WEIGHT
                + self.uniqueness * UNIQUENESS_WEIGHT,
        )
    }
}

/// Fraction of values whose string form matches the pattern. Non-string
/// values count as non-matching.
fn matching_fraction(values: &[&serde_json::Value], pattern: &Regex) -> f64 {
    let matching = values
        .iter()
        .filter(|v| v.as_str().is_some_and(|s| pattern.is_match(s)))
        .count();
    matching as f64 / values.len() as f64
}

/// Counts distinct values by comparable string form.
pub(crate) fn distinct_count(values: &[&serde_json::Value]) -> u64 {
    let distinct: HashSet<String> = values.iter().map(|v| comparable_key(v)).collect();
    distinct.len() as u64
}
