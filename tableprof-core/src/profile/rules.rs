//! Per-column business-rule validation notes.
//!
//! These are advisory strings attached to a column profile, distinct from
//! anomalies: they describe structural concerns (nulls in identifiers, high
//! category cardinality) rather than offending value sets.

use crate::models::coerce_numeric;

use super::quality::distinct_count;
use super::semantic::SemanticType;

/// Distinct-value ceiling for a well-behaved categorical column.
const CATEGORY_CARDINALITY_LIMIT: u64 = 50;

/// Magnitude above which numeric values are worth a second look.
const LARGE_VALUE_THRESHOLD: f64 = 1e6;

/// Validates a column's non-null values against semantic-type rules.
pub fn validate_business_rules(
    non_null: &[&serde_json::Value],
    null_count: u64,
    column_name: &str,
    semantic_type: SemanticType,
) -> Vec<String> {
    let mut notes = Vec::new();

    if non_null.is_empty() {
        notes.push(format!("column `{}` has only null values", column_name));
        return notes;
    }

    match semantic_type {
        SemanticType::Identifier => {
            if distinct_count(non_null) < non_null.len() as u64 {
                notes.push(format!(
                    "duplicate values found in identifier column `{}`",
                    column_name
                ));
            }
            if null_count > 0 {
                notes.push(format!(
                    "nulls found in identifier column `{}`; consider a NOT NULL constraint",
                    column_name
                ));
            }
        }
        SemanticType::Numeric => {
            let numeric: Vec<f64> = non_null.iter().filter_map(|v| coerce_numeric(v)).collect();
            if numeric.is_empty() {
                notes.push(format!(
                    "column `{}` could not be parsed as numeric",
                    column_name
                ));
                return notes;
            }
            if numeric.iter().any(|&v| v < 0.0) {
                notes.push(format!(
                    "negative values found in `{}`; check business logic",
                    column_name
                ));
            }
            if numeric.iter().any(|&v| v > LARGE_VALUE_THRESHOLD) {
                notes.push(format!(
                    "very large values in `{}`; investigate for outliers",
                    column_name
                ));
            }
        }
        SemanticType::Categorical => {
            if distinct_count(non_null) > CATEGORY_CARDINALITY_LIMIT {
                notes.push(format!(
                    "column `{}` has high cardinality for a category; may affect modeling",
                    column_name
                ));
            }
        }
        _ => {}
    }

    notes
}
