//! Table-level inference: business domain, criticality, recommendations,
//! narrative insights, and temporal trends.
//!
//! Everything here is rule-based and additive. The insight texts are
//! heuristic hints keyed off the inferred domain; they are reproducible but
//! explicitly approximate.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::models::TableSnapshot;

use super::models::{
    BusinessDomain, BusinessInsight, Criticality, Priority, Rating, Recommendation,
    RecommendationCategory,
};

/// Ordered table-name rules for domain inference; first match wins.
const DOMAIN_TABLE_RULES: &[(&[&str], BusinessDomain)] = &[
    (&["customer", "user", "client"], BusinessDomain::CustomerManagement),
    (&["order", "purchase", "transaction"], BusinessDomain::SalesOperations),
    (&["product", "item", "inventory"], BusinessDomain::ProductManagement),
    (&["employee", "staff", "hr"], BusinessDomain::HumanResources),
];

/// Column names whose presence marks a financial table.
const FINANCIAL_COLUMN_NAMES: &[&str] = &["price", "amount", "cost"];

/// Table-name terms that force high criticality.
const CRITICAL_TABLE_TERMS: &[&str] = &["customer", "order", "transaction"];

/// Row-count tiers for criticality.
const HIGH_CRITICALITY_ROWS: u64 = 1_000_000;
const MEDIUM_CRITICALITY_ROWS: u64 = 100_000;

/// Row count above which an indexing recommendation fires.
const INDEXING_ROW_THRESHOLD: u64 = 100_000;

/// Table quality score below which a validation recommendation fires.
const QUALITY_RECOMMENDATION_THRESHOLD: f64 = 0.8;

/// Infers the business domain from the table name, then the column names.
pub fn infer_business_domain(table_name: &str, column_names: &[String]) -> BusinessDomain {
    let table = table_name.to_lowercase();
    for (terms, domain) in DOMAIN_TABLE_RULES {
        if terms.iter().any(|t| table.contains(t)) {
            return *domain;
        }
    }

    let columns: Vec<String> = column_names.iter().map(|c| c.to_lowercase()).collect();
    if FINANCIAL_COLUMN_NAMES
        .iter()
        .any(|t| columns.iter().any(|c| c == t))
    {
        return BusinessDomain::FinancialManagement;
    }

    BusinessDomain::General
}

/// Assesses table criticality; checks run in fixed order, first match wins.
pub fn assess_criticality(table_name: &str, row_count: u64) -> Criticality {
    if row_count > HIGH_CRITICALITY_ROWS {
        return Criticality::High;
    }
    let table = table_name.to_lowercase();
    if CRITICAL_TABLE_TERMS.iter().any(|t| table.contains(t)) {
        return Criticality::High;
    }
    if row_count > MEDIUM_CRITICALITY_ROWS {
        return Criticality::Medium;
    }
    Criticality::Low
}

/// Generates prioritized table-level recommendations.
///
/// Rules are additive; each fires independently. `pii_columns` must be in
/// schema order so the masking recommendation lists columns predictably.
pub fn table_recommendations(
    table_quality_score: f64,
    row_count: u64,
    pii_columns: &[String],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if table_quality_score < QUALITY_RECOMMENDATION_THRESHOLD {
        recommendations.push(Recommendation {
            priority: Priority::High,
            category: RecommendationCategory::DataQuality,
            action: "Implement comprehensive data validation rules".to_string(),
            impact: format!(
                "Improve table quality score from {} to >0.8",
                table_quality_score
            ),
            effort: Rating::Medium,
            roi: Rating::High,
        });
    }

    if row_count > INDEXING_ROW_THRESHOLD {
        recommendations.push(Recommendation {
            priority: Priority::Medium,
            category: RecommendationCategory::Performance,
            action: "Add database indexes for frequently queried columns".to_string(),
            impact: "Improve query performance by 50-80%".to_string(),
            effort: Rating::Low,
            roi: Rating::High,
        });
    }

    if !pii_columns.is_empty() {
        recommendations.push(Recommendation {
            priority: Priority::High,
            category: RecommendationCategory::Security,
            action: format!(
                "Implement data masking for PII columns: {}",
                pii_columns.join(", ")
            ),
            impact: "Ensure GDPR/CCPA compliance".to_string(),
            effort: Rating::Medium,
            roi: Rating::High,
        });
    }

    recommendations
}

/// Generates narrative business insights for a profiled table.
pub fn business_insights(domain: BusinessDomain, column_names: &[String]) -> Vec<BusinessInsight> {
    let mut insights = Vec::new();

    if domain == BusinessDomain::CustomerManagement {
        insights.push(BusinessInsight {
            process: "customer_onboarding".to_string(),
            readiness: "85%".to_string(),
            insight: "Customer data quality is good but needs email validation".to_string(),
            automation_opportunity: "Auto-validate emails during registration".to_string(),
        });
    }

    if column_names
        .iter()
        .any(|c| c.to_lowercase().contains("price"))
    {
        insights.push(BusinessInsight {
            process: "pricing_strategy".to_string(),
            readiness: "90%".to_string(),
            insight: "Pricing data is consistent and complete".to_string(),
            automation_opportunity: "Implement dynamic pricing based on demand".to_string(),
        });
    }

    insights
}

/// Column-name terms that mark a column as date-like for trend analysis.
const TEMPORAL_COLUMN_TERMS: &[&str] = &["date", "time", "created", "updated"];

/// Summarizes temporal trends per date-like column.
///
/// A column contributes a `{name}_span` entry, plus a `{name}_growth_rate`
/// entry when its values cover more than one calendar month. Columns with
/// any unparseable value are skipped without error.
pub fn analyze_trends(snapshot: &TableSnapshot) -> BTreeMap<String, String> {
    let mut trends = BTreeMap::new();

    for column in &snapshot.columns {
        let name = column.name.to_lowercase();
        if !TEMPORAL_COLUMN_TERMS.iter().any(|t| name.contains(t)) {
            continue;
        }

        let mut dates: Vec<NaiveDateTime> = Vec::new();
        let mut parseable = true;
        for value in snapshot.non_null_values(&column.name) {
            match value.as_str().and_then(parse_datetime) {
                Some(dt) => dates.push(dt),
                None => {
                    parseable = false;
                    break;
                }
            }
        }
        if !parseable || dates.is_empty() {
            continue;
        }

        dates.sort();
        let first = dates[0];
        let last = dates[dates.len() - 1];
        let span_days = (last - first).num_days();
        trends.insert(format!("{}_span", column.name), format!("{} days", span_days));

        let mut monthly_counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
        for dt in &dates {
            *monthly_counts
                .entry((dt.date().year(), dt.date().month()))
                .or_insert(0) += 1;
        }
        if monthly_counts.len() > 1 {
            let counts: Vec<u64> = monthly_counts.values().copied().collect();
            let first_count = counts[0] as f64;
            let last_count = counts[counts.len() - 1] as f64;
            let growth = (last_count - first_count) / first_count * 100.0;
            trends.insert(
                format!("{}_growth_rate", column.name),
                format!("{:.1}% total growth", growth),
            );
        }
    }

    trends
}

/// Parses a date or datetime string in the formats the engine accepts.
fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    None
}
