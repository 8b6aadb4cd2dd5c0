//! Core profiling engine for tableprof.
//!
//! This crate turns in-memory table snapshots into structured
//! quality/semantic profiles: inferred semantic types, quality scores,
//! statistical anomalies, foreign-key candidates, and table-level
//! recommendations. It also resolves foreign keys across the merged schema
//! of several attached databases for relationship-diagram rendering.
//!
//! # Architecture
//! - Pure computation over immutable snapshots: no I/O, no network, no
//!   shared mutable state. Database access belongs to the caller.
//! - Per-column work fans out across a rayon pool; results reduce into an
//!   insertion-ordered profile map.
//! - Degrade-and-continue error handling: one bad column yields an
//!   error-tagged entry, never a failed table.
//!
//! # Output Guarantees
//! - Profiles are JSON-serializable, with numeric fields rounded for
//!   reproducibility (scores to 3 decimals, percentages to 2).
//! - Profiles carry counts and ratios only, never raw data values.

pub mod error;
pub mod logging;
pub mod models;
pub mod profile;
pub mod resolver;
pub mod validation;

// Re-export commonly used types
pub use error::{ProfileError, Result};
pub use logging::init_logging;
pub use models::{ColumnSchema, TableSnapshot};
pub use profile::{TableProfile, TableProfiler};
pub use resolver::{
    ForeignKeyRef, RelationshipEdge, SchemaColumn, SchemaMap, TableMeta, relationship_edges,
    resolve_foreign_keys,
};
pub use validation::{
    ValidationError, initialize_snapshot_validator, validate_and_parse_snapshot,
    validate_snapshot_input,
};
