//! Error types for the profiling engine.
//!
//! The engine follows a degrade-and-continue policy: only input rejection is
//! surfaced as a hard error. Column-level trouble is folded into the profile
//! itself (error-tagged column entries, low-severity error anomalies) so one
//! bad column never costs the caller the rest of the table.

use thiserror::Error;

/// Main error type for profiling operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Snapshot rejected before any profiling work started
    #[error("invalid snapshot for table '{table}': {reason}")]
    InvalidInput { table: String, reason: String },

    /// A single column's analysis failed; callers convert this into an
    /// error-tagged column profile rather than propagating it
    #[error("column analysis failed for '{column}': {reason}")]
    ColumnAnalysis { column: String, reason: String },

    /// Serialization or deserialization failed
    #[error("serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error (logging setup, CLI wiring)
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with `ProfileError`
pub type Result<T> = std::result::Result<T, ProfileError>;

impl ProfileError {
    /// Creates an input-rejection error for a table.
    pub fn invalid_input(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Creates a column-level analysis error.
    pub fn column_analysis(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ColumnAnalysis {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Creates a serialization error with context.
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
