//! Output data models for table profiling.
//!
//! Every record here is built once during a profiling run and never mutated
//! afterwards. All metrics are counts and ratios; actual data values never
//! appear in a profile, only in descriptions the engine itself composes
//! (bounds, counts).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::semantic::SemanticType;

/// Severity of a detected anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; usually a degraded detection pass
    Low,
    /// Worth reviewing
    Medium,
    /// Likely a data defect
    High,
}

/// Kind of anomaly detected in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Value outside the IQR fences of its column
    StatisticalOutlier,
    /// Value violating a domain rule (e.g. impossible age)
    BusinessRuleViolation,
    /// A detection pass itself failed and was degraded
    Error,
}

/// A single anomaly finding.
///
/// One record summarizes a whole finding set (e.g. all outliers of a
/// column), never one record per offending value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    /// Anomaly kind
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    /// Severity of the finding
    pub severity: Severity,
    /// Number of offending values, when countable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Offending fraction of non-null values, as a percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    /// Human-readable description of the finding
    pub description: String,
    /// Suggested remediation
    pub recommendation: String,
}

impl Anomaly {
    /// Creates a statistical-outlier summary record.
    pub fn statistical_outlier(
        count: u64,
        percentage: f64,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        let severity = if percentage >= 5.0 {
            Severity::High
        } else {
            Severity::Medium
        };
        Self {
            kind: AnomalyKind::StatisticalOutlier,
            severity,
            count: Some(count),
            percentage: Some(percentage),
            description: description.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Creates a business-rule violation record.
    pub fn business_rule_violation(
        count: u64,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            kind: AnomalyKind::BusinessRuleViolation,
            severity: Severity::High,
            count: Some(count),
            percentage: None,
            description: description.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Creates a degraded-detection record.
    pub fn detection_error(
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            kind: AnomalyKind::Error,
            severity: Severity::Low,
            count: None,
            percentage: None,
            description: description.into(),
            recommendation: recommendation.into(),
        }
    }
}

/// Cardinality class of a column, from the unique/total ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Empty column
    None,
    /// Ratio in (0, 0.3]
    Low,
    /// Ratio in (0.3, 0.7]
    Medium,
    /// Ratio above 0.7 but with duplicates
    High,
    /// Every value distinct
    Unique,
}

impl Cardinality {
    /// Classifies a unique/total pair.
    pub fn classify(unique_count: u64, total_count: u64) -> Self {
        if total_count == 0 {
            return Cardinality::None;
        }
        if unique_count == total_count {
            return Cardinality::Unique;
        }
        let ratio = unique_count as f64 / total_count as f64;
        if ratio > 0.7 {
            Cardinality::High
        } else if ratio > 0.3 {
            Cardinality::Medium
        } else if ratio > 0.0 {
            Cardinality::Low
        } else {
            Cardinality::None
        }
    }
}

/// The four quality ratios that feed a column's quality score.
///
/// Consistency and validity default to 1.0 for semantic types without an
/// explicit rule. This inflates scores for most non-PII, non-financial
/// columns; downstream recommendation thresholds were tuned against that
/// baseline, so the defaults are load-bearing and must not be "fixed".
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityBreakdown {
    /// 1 − null fraction
    pub completeness: f64,
    /// Format-adherence fraction (email/phone patterns)
    pub consistency: f64,
    /// Domain-rule compliance fraction (non-negative amounts)
    pub validity: f64,
    /// Distinct/total fraction for identifier-like columns
    pub uniqueness: f64,
}

/// How a relationship candidate was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Column-name convention only
    NamingHeuristic,
    /// Name convention plus value-shape analysis
    StatisticalAnalysis,
    /// Confirmed against another table's schema
    SchemaConfirmed,
}

/// A hypothesized foreign-key link from a column to another table.
///
/// Candidates below the retention threshold are dropped at inference time,
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipCandidate {
    /// Source column
    pub column: String,
    /// Best-guess referenced table (base entity name)
    pub references_table: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// How the candidate was detected
    pub detection_method: DetectionMethod,
}

/// Coarse importance tier for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Low,
    Medium,
    High,
}

/// Coarse functional category inferred from table/column naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessDomain {
    CustomerManagement,
    SalesOperations,
    ProductManagement,
    HumanResources,
    FinancialManagement,
    General,
}

/// Priority tier for recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Coarse effort/return rating on a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Low,
    Medium,
    High,
}

/// Category of a table-level recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    DataQuality,
    Performance,
    Security,
}

/// An actionable, prioritized table-level recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Priority tier
    pub priority: Priority,
    /// Recommendation category
    pub category: RecommendationCategory,
    /// What to do
    pub action: String,
    /// Expected impact
    pub impact: String,
    /// Estimated effort
    pub effort: Rating,
    /// Estimated return on investment
    pub roi: Rating,
}

/// A narrative, lower-confidence business hint keyed off the inferred
/// domain. Reproducible but explicitly approximate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessInsight {
    /// Business process the insight concerns
    pub process: String,
    /// Rough readiness estimate for automating the process
    pub readiness: String,
    /// The hint itself
    pub insight: String,
    /// Automation opportunity suggested by the data
    pub automation_opportunity: String,
}

/// Derived profile of a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name
    pub column_name: String,
    /// Declared storage type from the schema
    pub data_type: String,
    /// Inferred semantic type
    pub semantic_type: SemanticType,
    /// Whether the column is (part of) the primary key
    pub is_primary_key: bool,
    /// Rows in the snapshot
    pub total_count: u64,
    /// Null (or missing) values
    pub null_count: u64,
    /// Null fraction as a percentage, 2 decimals
    pub null_percentage: f64,
    /// Distinct non-null values
    pub unique_count: u64,
    /// Distinct fraction of all rows as a percentage, 2 decimals
    pub unique_percentage: f64,
    /// Cardinality class
    pub cardinality: Cardinality,
    /// Weighted quality score in [0, 1]; absent for errored columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    /// The four quality sub-metrics; absent for errored columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_breakdown: Option<QualityBreakdown>,
    /// Anomalies detected in this column
    pub anomalies: Vec<Anomaly>,
    /// Business-rule violation notes
    pub business_rules: Vec<String>,
    /// Column-specific recommendations
    pub recommendations: Vec<String>,
    /// Analysis failure message, when this column's profiling errored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ColumnProfile {
    /// Creates an error-tagged profile for a column whose analysis failed.
    ///
    /// Errored columns are excluded from the table quality mean but still
    /// appear in the column map, so partial failure never hides a column.
    pub fn failed(
        column_name: impl Into<String>,
        data_type: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            data_type: data_type.into(),
            semantic_type: SemanticType::Unknown,
            is_primary_key: false,
            total_count: 0,
            null_count: 0,
            null_percentage: 0.0,
            unique_count: 0,
            unique_percentage: 0.0,
            cardinality: Cardinality::None,
            quality_score: None,
            quality_breakdown: None,
            anomalies: Vec::new(),
            business_rules: Vec::new(),
            recommendations: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Whether this column's analysis failed.
    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }
}

/// Complete profile of one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableProfile {
    /// Table name
    pub table_name: String,
    /// When the analysis ran (ISO-8601)
    pub analysis_timestamp: DateTime<Utc>,
    /// Rows in the snapshot
    pub total_records: u64,
    /// Columns in the schema
    pub total_columns: u64,
    /// Approximate in-memory footprint of the snapshot, MB, 2 decimals
    pub memory_usage_mb: f64,
    /// Mean of non-errored column quality scores, 3 decimals
    pub table_quality_score: f64,
    /// Inferred business domain
    pub business_domain: BusinessDomain,
    /// Inferred criticality tier
    pub criticality: Criticality,
    /// Column profiles in schema order
    pub column_profiles: IndexMap<String, ColumnProfile>,
    /// Retained foreign-key candidates
    pub relationships: Vec<RelationshipCandidate>,
    /// All column anomalies, aggregated in schema order
    pub anomalies: Vec<Anomaly>,
    /// Temporal trend summary per date-like column
    pub trends: BTreeMap<String, String>,
    /// Prioritized table-level recommendations
    pub actionable_recommendations: Vec<Recommendation>,
    /// Narrative business insights
    pub business_insights: Vec<BusinessInsight>,
}
