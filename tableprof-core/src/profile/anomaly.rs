//! Anomaly detection for column values.
//!
//! Two independent passes whose results are concatenated:
//!
//! 1. Statistical outliers on numeric-coercible columns, using IQR fences
//!    (Tukey's rule at 1.5·IQR). One summary record per column, never one
//!    per value.
//! 2. Business rules from a static value-range rule table. Every rule is
//!    evaluated; a rule firing never short-circuits the rest.
//!
//! A failed pass degrades into a low-severity error record and the remaining
//! passes continue.

use crate::models::{coerce_numeric, round2};

use super::models::Anomaly;

/// Minimum numeric values required for the statistical pass.
const MIN_STATISTICAL_SAMPLE: usize = 10;

/// IQR fence multiplier.
const IQR_FENCE: f64 = 1.5;

/// A value-range business rule, keyed by a column-name fragment.
struct RangeRule {
    name_fragment: &'static str,
    min: f64,
    max: f64,
    violation_label: &'static str,
    recommendation: &'static str,
}

/// Seeded rule set. Rules are additive; adding a rule must not change the
/// behavior of existing ones.
const RANGE_RULES: &[RangeRule] = &[RangeRule {
    name_fragment: "age",
    min: 0.0,
    max: 120.0,
    violation_label: "invalid age values",
    recommendation: "Implement age validation rules",
}];

/// Detects anomalies in a column's non-null values.
pub fn detect_anomalies(values: &[&serde_json::Value], column_name: &str) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    anomalies.extend(statistical_outliers(values, column_name));

    let name = column_name.to_lowercase();
    for rule in RANGE_RULES {
        if !name.contains(rule.name_fragment) {
            continue;
        }
        let numeric: Vec<f64> = values.iter().filter_map(|v| coerce_numeric(v)).collect();
        let violation_count = numeric
            .iter()
            .filter(|&&v| v < rule.min || v > rule.max)
            .count() as u64;
        if violation_count > 0 {
            anomalies.push(Anomaly::business_rule_violation(
                violation_count,
                format!("{} records with {}", violation_count, rule.violation_label),
                rule.recommendation,
            ));
        }
    }

    anomalies
}

/// Runs the IQR outlier pass, returning at most one summary record.
fn statistical_outliers(values: &[&serde_json::Value], column_name: &str) -> Option<Anomaly> {
    let has_non_finite = values.iter().any(|v| {
        matches!(v, serde_json::Value::String(s)
            if s.trim().parse::<f64>().is_ok_and(|n| !n.is_finite()))
    });
    if has_non_finite {
        // Degrade rather than let NaN/inf poison the quantiles
        return Some(Anomaly::detection_error(
            format!(
                "statistical outlier detection failed for `{}`: non-finite value encountered",
                column_name
            ),
            "Ensure the column contains valid numeric data",
        ));
    }

    let mut numeric: Vec<f64> = values.iter().filter_map(|v| coerce_numeric(v)).collect();
    if numeric.len() <= MIN_STATISTICAL_SAMPLE {
        return None;
    }

    numeric.sort_by(f64::total_cmp);
    let (lower, upper) = iqr_bounds(&numeric);

    let outlier_count = numeric.iter().filter(|&&v| v < lower || v > upper).count() as u64;
    if outlier_count == 0 {
        return None;
    }

    let fraction = outlier_count as f64 / numeric.len() as f64;
    Some(Anomaly::statistical_outlier(
        outlier_count,
        round2(fraction * 100.0),
        format!(
            "{} outliers detected outside [{:.2}, {:.2}]",
            outlier_count, lower, upper
        ),
        "Review data entry process and validate extreme values",
    ))
}

/// Computes the Tukey fences [Q1 − 1.5·IQR, Q3 + 1.5·IQR] for sorted values.
pub(crate) fn iqr_bounds(sorted: &[f64]) -> (f64, f64) {
    let q1 = quantile(sorted, 0.25);
    let q3 = quantile(sorted, 0.75);
    let iqr = q3 - q1;
    (q1 - IQR_FENCE * iqr, q3 + IQR_FENCE * iqr)
}

/// Linear-interpolation quantile over sorted values (position `(n−1)·q`).
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            let position = (sorted.len() - 1) as f64 * q;
            let low = position.floor() as usize;
            let high = (low + 1).min(sorted.len() - 1);
            let weight = position - low as f64;
            sorted[low] + weight * (sorted[high] - sorted[low])
        }
    }
}
