//! Table profiler facade.
//!
//! Orchestrates the per-column analyses and rolls their results into a
//! [`TableProfile`]. Column profiling is embarrassingly parallel over the
//! immutable snapshot, so columns fan out across the rayon pool; the ordered
//! reduction into the column map is the only synchronization point.
//!
//! Partial profile on partial failure is a hard contract here: a column
//! whose analysis fails degrades to an error-tagged entry and is excluded
//! from the table quality mean, while every other column and the table-level
//! aggregation complete normally.

use chrono::Utc;
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::error::{ProfileError, Result};
use crate::models::{ColumnSchema, TableSnapshot, round2, round3};
use crate::resolver::SchemaMap;

use super::anomaly::detect_anomalies;
use super::insights::{
    analyze_trends, assess_criticality, business_insights, infer_business_domain,
    table_recommendations,
};
use super::models::{Anomaly, ColumnProfile, TableProfile};
use super::quality::{assess_column, distinct_count};
use super::relationships::infer_relationships;
use super::rules::validate_business_rules;
use super::semantic;

/// Column quality score below which an improvement note is attached.
const COLUMN_QUALITY_NOTE_THRESHOLD: f64 = 0.7;

/// Null percentage above which a null-handling note is attached.
const NULL_PERCENTAGE_NOTE_THRESHOLD: f64 = 20.0;

/// Profiles table snapshots into quality/semantic profiles.
///
/// The profiler is stateless; scoring weights and retention thresholds are
/// fixed policy constants, so two runs over the same snapshot produce the
/// same profile (timestamp aside).
///
/// # Example
///
/// ```rust,ignore
/// use tableprof_core::profile::TableProfiler;
///
/// let profiler = TableProfiler::new();
/// let profile = profiler.profile(&snapshot, None)?;
/// println!("quality: {:.3}", profile.table_quality_score);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TableProfiler;

impl TableProfiler {
    /// Creates a new profiler.
    pub fn new() -> Self {
        Self
    }

    /// Profiles one snapshot, optionally confirming relationship candidates
    /// against a cross-table schema map.
    ///
    /// # Errors
    /// Returns an input-rejection error for malformed snapshots (no columns,
    /// duplicate column names, non-object rows). Column-level trouble never
    /// errors; it degrades per the partial-failure contract.
    pub fn profile(
        &self,
        snapshot: &TableSnapshot,
        cross_schema: Option<&SchemaMap>,
    ) -> Result<TableProfile> {
        validate_snapshot(snapshot)?;

        let profiles: Vec<ColumnProfile> = snapshot
            .columns
            .par_iter()
            .map(|column| match profile_column(snapshot, column) {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!(
                        "column profiling failed for `{}`.`{}`: {}",
                        snapshot.table_name,
                        column.name,
                        e
                    );
                    ColumnProfile::failed(&column.name, &column.declared_type, e.to_string())
                }
            })
            .collect();

        Ok(aggregate(snapshot, profiles, cross_schema))
    }

    /// Profiles a batch of snapshots.
    ///
    /// Snapshots that fail input validation are logged and skipped rather
    /// than aborting the batch, so partial results stay available.
    pub fn profile_all(
        &self,
        snapshots: &[TableSnapshot],
        cross_schema: Option<&SchemaMap>,
    ) -> Vec<TableProfile> {
        let mut profiles = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            match self.profile(snapshot, cross_schema) {
                Ok(profile) => profiles.push(profile),
                Err(e) => {
                    tracing::warn!("profiling failed for table '{}': {}", snapshot.table_name, e);
                }
            }
        }
        profiles
    }
}

/// Rejects snapshots the engine cannot profile at all.
fn validate_snapshot(snapshot: &TableSnapshot) -> Result<()> {
    if snapshot.table_name.trim().is_empty() {
        return Err(ProfileError::invalid_input(
            &snapshot.table_name,
            "table name is empty",
        ));
    }
    if snapshot.columns.is_empty() {
        return Err(ProfileError::invalid_input(
            &snapshot.table_name,
            "snapshot has no column schema",
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for column in &snapshot.columns {
        if !seen.insert(column.name.as_str()) {
            return Err(ProfileError::invalid_input(
                &snapshot.table_name,
                format!("duplicate column name '{}'", column.name),
            ));
        }
    }

    if let Some(position) = snapshot.rows.iter().position(|row| !row.is_object()) {
        return Err(ProfileError::invalid_input(
            &snapshot.table_name,
            format!("row {} is not a JSON object", position),
        ));
    }

    Ok(())
}

/// Profiles a single column of the snapshot.
fn profile_column(snapshot: &TableSnapshot, column: &ColumnSchema) -> Result<ColumnProfile> {
    let total_count = snapshot.row_count() as u64;
    let non_null = snapshot.non_null_values(&column.name);
    let null_count = total_count - non_null.len() as u64;
    let unique_count = distinct_count(&non_null);

    let null_percentage = percentage(null_count, total_count);
    let unique_percentage = percentage(unique_count, total_count);

    let semantic_type = semantic::classify(&column.name, &column.declared_type);

    let all_values: Vec<&serde_json::Value> = snapshot.column_values(&column.name).collect();
    let quality_breakdown = assess_column(&all_values, &column.name, semantic_type);
    let quality_score = quality_breakdown.score();

    let anomalies = detect_anomalies(&non_null, &column.name);
    let business_rules =
        validate_business_rules(&non_null, null_count, &column.name, semantic_type);

    let mut recommendations = Vec::new();
    if quality_score < COLUMN_QUALITY_NOTE_THRESHOLD {
        recommendations.push(format!("Improve data quality for {}", column.name));
    }
    if null_percentage > NULL_PERCENTAGE_NOTE_THRESHOLD {
        recommendations.push(format!("Address high null percentage in {}", column.name));
    }
    if semantic_type.is_pii() {
        recommendations.push(format!(
            "Implement data masking for PII column {}",
            column.name
        ));
    }

    Ok(ColumnProfile {
        column_name: column.name.clone(),
        data_type: column.declared_type.clone(),
        semantic_type,
        is_primary_key: column.is_primary_key,
        total_count,
        null_count,
        null_percentage,
        unique_count,
        unique_percentage,
        cardinality: super::models::Cardinality::classify(unique_count, total_count),
        quality_score: Some(quality_score),
        quality_breakdown: Some(quality_breakdown),
        anomalies,
        business_rules,
        recommendations,
        error: None,
    })
}

/// Rolls column profiles into the table profile.
fn aggregate(
    snapshot: &TableSnapshot,
    profiles: Vec<ColumnProfile>,
    cross_schema: Option<&SchemaMap>,
) -> TableProfile {
    let scores: Vec<f64> = profiles.iter().filter_map(|p| p.quality_score).collect();
    let table_quality_score = if scores.is_empty() {
        0.0
    } else {
        round3(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    let column_names: Vec<String> = snapshot.columns.iter().map(|c| c.name.clone()).collect();
    let pii_columns: Vec<String> = profiles
        .iter()
        .filter(|p| p.semantic_type.is_pii())
        .map(|p| p.column_name.clone())
        .collect();

    let anomalies: Vec<Anomaly> = profiles
        .iter()
        .flat_map(|p| p.anomalies.iter().cloned())
        .collect();

    let business_domain = infer_business_domain(&snapshot.table_name, &column_names);
    let row_count = snapshot.row_count() as u64;

    let column_profiles: IndexMap<String, ColumnProfile> = profiles
        .into_iter()
        .map(|p| (p.column_name.clone(), p))
        .collect();

    TableProfile {
        table_name: snapshot.table_name.clone(),
        analysis_timestamp: Utc::now(),
        total_records: row_count,
        total_columns: snapshot.columns.len() as u64,
        memory_usage_mb: estimated_memory_mb(&snapshot.rows),
        table_quality_score,
        business_domain,
        criticality: assess_criticality(&snapshot.table_name, row_count),
        column_profiles,
        relationships: infer_relationships(snapshot, cross_schema),
        anomalies,
        trends: analyze_trends(snapshot),
        actionable_recommendations: table_recommendations(
            table_quality_score,
            row_count,
            &pii_columns,
        ),
        business_insights: business_insights(business_domain, &column_names),
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(part as f64 / total as f64 * 100.0)
    }
}

/// Estimates the snapshot's in-memory footprint in megabytes.
///
/// A deterministic per-value heuristic; close enough for the size tier the
/// recommendations care about, never a measured allocation.
fn estimated_memory_mb(rows: &[serde_json::Value]) -> f64 {
    let bytes: usize = rows.iter().map(value_size).sum();
    round2(bytes as f64 / 1024.0 / 1024.0)
}

fn value_size(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Null => 8,
        serde_json::Value::Bool(_) => 8,
        serde_json::Value::Number(_) => 16,
        serde_json::Value::String(s) => 24 + s.len(),
        serde_json::Value::Array(items) => 24 + items.iter().map(value_size).sum::<usize>(),
        serde_json::Value::Object(map) => {
            24 + map
                .iter()
                .map(|(k, v)| 24 + k.len() + value_size(v))
                .sum::<usize>()
        }
    }
}
