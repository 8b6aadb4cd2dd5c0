//! JSON Schema validation for snapshot input.
//!
//! Snapshots typically arrive as JSON files produced by whatever layer read
//! the database. Validating the raw JSON before deserialization turns
//! malformed input into structured rejection messages instead of opaque
//! deserializer errors, and guarantees the engine never starts work on a
//! half-usable snapshot.
//!
//! # Example
//! ```rust
//! use tableprof_core::validation::{initialize_snapshot_validator, validate_snapshot_input};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! initialize_snapshot_validator()?;
//!
//! let input = json!({
//!     "table_name": "users",
//!     "columns": [{"name": "id", "declared_type": "INTEGER"}],
//!     "rows": [{"id": 1}]
//! });
//! validate_snapshot_input(&input)?;
//! # Ok(())
//! # }
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::TableSnapshot;

/// Validation errors for snapshot input.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema compilation failed during initialization
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation { message: String },

    /// Validation failed with specific field errors
    #[error("snapshot validation failed with {error_count} errors: {errors:?}")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<String>,
    },

    /// JSON parsing error
    #[error("JSON parsing failed: {source}")]
    JsonParsing {
        #[from]
        source: serde_json::Error,
    },
}

/// Embedded JSON Schema for the snapshot input format.
const SNAPSHOT_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "tableprof table snapshot",
  "type": "object",
  "required": ["table_name", "columns", "rows"],
  "properties": {
    "table_name": { "type": "string", "minLength": 1 },
    "columns": {
      "type": "array",
      "minItems": 1,
      "items": {
        "type": "object",
        "required": ["name", "declared_type"],
        "properties": {
          "name": { "type": "string", "minLength": 1 },
          "declared_type": { "type": "string" },
          "nullable": { "type": "boolean" },
          "default_value": { "type": ["string", "null"] },
          "is_primary_key": { "type": "boolean" }
        }
      }
    },
    "rows": {
      "type": "array",
      "items": { "type": "object" }
    }
  }
}"#;

/// Compiled JSON Schema instance (initialized once)
static COMPILED_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Compiles and caches the embedded snapshot schema.
///
/// Safe to call more than once; later calls are no-ops.
///
/// # Errors
/// Returns `ValidationError::SchemaCompilation` if the embedded schema is
/// invalid.
pub fn initialize_snapshot_validator() -> Result<(), ValidationError> {
    let schema_json: Value =
        serde_json::from_str(SNAPSHOT_SCHEMA).map_err(|e| ValidationError::SchemaCompilation {
            message: format!("failed to parse embedded schema: {}", e),
        })?;

    let compiled = jsonschema::validator_for(&schema_json).map_err(|e| {
        ValidationError::SchemaCompilation {
            message: format!("schema compilation error: {}", e),
        }
    })?;

    let _ = COMPILED_SCHEMA.set(compiled);

    Ok(())
}

/// Validates a snapshot JSON value against the input schema.
///
/// # Errors
/// Returns `ValidationFailed` when the value does not conform.
pub fn validate_snapshot_input(input: &Value) -> Result<(), ValidationError> {
    if COMPILED_SCHEMA.get().is_none() {
        initialize_snapshot_validator()?;
    }
    let schema = COMPILED_SCHEMA
        .get()
        .ok_or_else(|| ValidationError::SchemaCompilation {
            message: "snapshot validator not initialized".to_string(),
        })?;

    if let Err(validation_error) = schema.validate(input) {
        return Err(ValidationError::ValidationFailed {
            error_count: 1,
            errors: vec![format!("snapshot validation failed: {}", validation_error)],
        });
    }

    Ok(())
}

/// Validates raw snapshot JSON text and deserializes it.
///
/// # Errors
/// Returns parsing errors for malformed JSON and `ValidationFailed` for
/// structurally invalid snapshots.
pub fn validate_and_parse_snapshot(raw: &str) -> Result<TableSnapshot, ValidationError> {
    let value: Value = serde_json::from_str(raw)?;
    validate_snapshot_input(&value)?;
    let snapshot: TableSnapshot = serde_json::from_value(value)?;
    Ok(snapshot)
}
