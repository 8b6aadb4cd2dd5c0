//! Table profiling module.
//!
//! Produces per-table and per-column quality/semantic profiles:
//! - **Semantic classification**: business-meaning category per column
//! - **Quality assessment**: completeness, consistency, validity, uniqueness
//!   and a fixed-weight score
//! - **Anomaly detection**: IQR outliers plus business-rule checks
//! - **Relationship inference**: foreign-key candidates from naming and
//!   value shape
//! - **Aggregation**: table score, domain/criticality inference,
//!   recommendations and insights
//!
//! Profiles contain only counts, ratios, and engine-composed descriptions,
//! never raw data values.
//!
//! # Example
//! ```rust,ignore
//! use tableprof_core::profile::TableProfiler;
//!
//! let profiler = TableProfiler::new();
//! let profile = profiler.profile(&snapshot, None)?;
//! println!("score: {:.3}", profile.table_quality_score);
//! ```

mod anomaly;
mod insights;
mod models;
mod profiler;
mod quality;
mod relationships;
mod rules;
mod semantic;

// Re-export public API
pub use anomaly::detect_anomalies;
pub use insights::{
    analyze_trends, assess_criticality, business_insights, infer_business_domain,
    table_recommendations,
};
pub use models::{
    Anomaly, AnomalyKind, BusinessDomain, BusinessInsight, Cardinality, ColumnProfile,
    Criticality, DetectionMethod, Priority, QualityBreakdown, Rating, Recommendation,
    RecommendationCategory, RelationshipCandidate, Severity, TableProfile,
};
pub use profiler::TableProfiler;
pub use quality::assess_column;
pub use relationships::infer_relationships;
pub use rules::validate_business_rules;
pub use semantic::{SemanticType, classify};
