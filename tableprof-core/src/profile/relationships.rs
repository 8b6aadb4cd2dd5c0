//! Per-table foreign-key candidate inference.
//!
//! Detection works from naming convention: a non-primary-key column ending
//! in `_id` hypothesizes a reference to the entity named by the stripped
//! suffix. Confidence comes from value shape (identifier-like columns hold
//! positive whole numbers); only candidates above the retention threshold
//! are kept, the rest are dropped rather than stored.

use crate::models::{TableSnapshot, coerce_numeric};
use crate::resolver::{SchemaMap, find_target_table};

use super::models::{DetectionMethod, RelationshipCandidate};

/// Candidates at or below this confidence are discarded.
const CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Infers retained foreign-key candidates for a snapshot.
///
/// When a cross-table schema map is supplied, candidates whose target table
/// resolves in it (same matching rules as the schema-wide resolver) are
/// upgraded from statistical to schema-confirmed detection.
pub fn infer_relationships(
    snapshot: &TableSnapshot,
    cross_schema: Option<&SchemaMap>,
) -> Vec<RelationshipCandidate> {
    let mut candidates = Vec::new();

    for column in &snapshot.columns {
        if column.is_primary_key || !column.name.ends_with("_id") {
            continue;
        }
        let base = column.name.trim_end_matches("_id");

        let confidence = reference_confidence(&snapshot.non_null_values(&column.name));
        if confidence <= CONFIDENCE_THRESHOLD {
            tracing::debug!(
                "dropping relationship candidate {}.{} (confidence {:.2})",
                snapshot.table_name,
                column.name,
                confidence
            );
            continue;
        }

        let detection_method = match cross_schema {
            Some(schema) if find_target_table(schema, base).is_some() => {
                DetectionMethod::SchemaConfirmed
            }
            _ => DetectionMethod::StatisticalAnalysis,
        };

        candidates.push(RelationshipCandidate {
            column: column.name.clone(),
            references_table: base.to_string(),
            confidence,
            detection_method,
        });
    }

    candidates
}

/// Scores how much a value set looks like a foreign-key reference.
///
/// Numeric value sets score by the fraction of positive whole numbers;
/// non-numeric identifier columns get a flat 0.5; empty columns 0.0.
fn reference_confidence(values: &[&serde_json::Value]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    if values.iter().all(|v| v.is_number()) {
        let reference_like = values
            .iter()
            .filter_map(|v| coerce_numeric(v))
            .filter(|&n| n > 0.0 && n == n.trunc())
            .count();
        return reference_like as f64 / values.len() as f64;
    }

    0.5
}
