//! Input-side data models for table profiling.
//!
//! A [`TableSnapshot`] is the unit of work handed to the engine: the table
//! name, the declared column schema, and the sampled rows as JSON objects
//! keyed by column name. Snapshots are supplied by the caller (the layer
//! that actually reads the database) and are never mutated by the engine.

use serde::{Deserialize, Serialize};

static NULL_VALUE: serde_json::Value = serde_json::Value::Null;

/// Declared schema for a single column, as reported by the source database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name, unique within its table
    pub name: String,
    /// Declared storage type (e.g. `INTEGER`, `VARCHAR(64)`)
    pub declared_type: String,
    /// Whether the column accepts nulls
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Declared default value, if any
    #[serde(default)]
    pub default_value: Option<String>,
    /// Whether the column is (part of) the primary key
    #[serde(default)]
    pub is_primary_key: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnSchema {
    /// Creates a nullable, non-key column with the given name and type.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable: true,
            default_value: None,
            is_primary_key: false,
        }
    }

    /// Builder method to mark the column as primary key.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false;
        self
    }

    /// Builder method to mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Immutable in-memory snapshot of one table.
///
/// Rows are JSON objects keyed by column name; a key absent from a row reads
/// as null. The engine treats the snapshot as read-only for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Table name
    pub table_name: String,
    /// Declared column schema, in table order
    pub columns: Vec<ColumnSchema>,
    /// Sampled rows as JSON objects
    pub rows: Vec<serde_json::Value>,
}

impl TableSnapshot {
    /// Creates a new snapshot.
    pub fn new(
        table_name: impl Into<String>,
        columns: Vec<ColumnSchema>,
        rows: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            rows,
        }
    }

    /// Number of sampled rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Looks up a column schema by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Iterates the values of one column across all rows.
    ///
    /// Missing keys and non-object rows yield null, so the iterator always
    /// produces exactly one value per row.
    pub fn column_values<'a>(
        &'a self,
        column_name: &'a str,
    ) -> impl Iterator<Item = &'a serde_json::Value> + 'a {
        self.rows.iter().map(move |row| {
            row.as_object()
                .and_then(|obj| obj.get(column_name))
                .unwrap_or(&NULL_VALUE)
        })
    }

    /// Collects the non-null values of one column.
    pub fn non_null_values<'a>(&'a self, column_name: &'a str) -> Vec<&'a serde_json::Value> {
        self.column_values(column_name)
            .filter(|v| !v.is_null())
            .collect()
    }
}

/// Extracts a finite numeric value from a JSON value.
///
/// Accepts JSON numbers and numeric strings. Non-finite results ("NaN",
/// "inf") are rejected so they cannot poison statistical calculations.
pub(crate) fn coerce_numeric(value: &serde_json::Value) -> Option<f64> {
    let numeric = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    numeric.filter(|v| v.is_finite())
}

/// Converts a JSON value to a comparable string for distinct-counting.
pub(crate) fn comparable_key(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "__NULL__".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|e| {
            tracing::trace!("failed to serialize value for distinct-counting: {}", e);
            "__SERIALIZE_ERROR__".to_string()
        }),
    }
}

/// Rounds to 3 decimal places (score precision).
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Rounds to 2 decimal places (percentage precision).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
