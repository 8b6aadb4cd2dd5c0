//! End-to-end profiling scenarios over realistic snapshots.

use serde_json::{Value, json};
use tableprof_core::profile::{
    AnomalyKind, Cardinality, DetectionMethod, Priority, RecommendationCategory, SemanticType,
    Severity, TableProfiler,
};
use tableprof_core::resolver::{
    SchemaColumn, SchemaMap, TableMeta, relationship_edges, resolve_foreign_keys,
};
use tableprof_core::{ColumnSchema, TableSnapshot};

fn orders_snapshot() -> TableSnapshot {
    let rows = (1..=20)
        .map(|i| {
            json!({
                "id": i,
                "customer_id": (i % 7) + 1,
                "price": 10.0 + i as f64,
                "status": if i % 2 == 0 { "shipped" } else { "pending" },
                "created_at": format!("2024-{:02}-15", (i % 3) + 1),
            })
        })
        .collect();

    TableSnapshot::new(
        "orders",
        vec![
            ColumnSchema::new("id", "INTEGER").primary_key(),
            ColumnSchema::new("customer_id", "INTEGER"),
            ColumnSchema::new("price", "REAL"),
            ColumnSchema::new("status", "TEXT"),
            ColumnSchema::new("created_at", "TEXT"),
        ],
        rows,
    )
}

#[test]
fn quality_score_is_weighted_sum_of_submetrics() {
    let profile = TableProfiler::new().profile(&orders_snapshot(), None).unwrap();

    for column in profile.column_profiles.values() {
        let score = column.quality_score.unwrap();
        assert!((0.0..=1.0).contains(&score), "score out of bounds: {score}");

        let b = column.quality_breakdown.unwrap();
        let weighted =
            b.completeness * 0.30 + b.consistency * 0.25 + b.validity * 0.25 + b.uniqueness * 0.20;
        let expected = (weighted * 1000.0).round() / 1000.0;
        assert!(
            (score - expected).abs() < 1e-9,
            "column {}: {score} != {expected}",
            column.column_name
        );
    }
}

#[test]
fn table_score_is_mean_of_column_scores() {
    let profile = TableProfiler::new().profile(&orders_snapshot(), None).unwrap();

    let scores: Vec<f64> = profile
        .column_profiles
        .values()
        .filter_map(|c| c.quality_score)
        .collect();
    let mean = (scores.iter().sum::<f64>() / scores.len() as f64 * 1000.0).round() / 1000.0;

    assert_eq!(profile.table_quality_score, mean);
}

#[test]
fn profiling_is_idempotent_modulo_timestamp() {
    let snapshot = orders_snapshot();
    let profiler = TableProfiler::new();

    let mut first = serde_json::to_value(profiler.profile(&snapshot, None).unwrap()).unwrap();
    let mut second = serde_json::to_value(profiler.profile(&snapshot, None).unwrap()).unwrap();

    first["analysis_timestamp"] = Value::Null;
    second["analysis_timestamp"] = Value::Null;

    assert_eq!(first, second);
}

#[test]
fn cardinality_classification() {
    let snapshot = TableSnapshot::new(
        "t",
        vec![
            ColumnSchema::new("unique_col", "INTEGER"),
            ColumnSchema::new("constant_col", "TEXT"),
        ],
        (0..5)
            .map(|i| json!({"unique_col": i, "constant_col": "same"}))
            .collect(),
    );
    let profile = TableProfiler::new().profile(&snapshot, None).unwrap();

    assert_eq!(
        profile.column_profiles["unique_col"].cardinality,
        Cardinality::Unique
    );
    assert_eq!(
        profile.column_profiles["constant_col"].cardinality,
        Cardinality::Low
    );

    let empty = TableSnapshot::new("t", vec![ColumnSchema::new("c", "TEXT")], vec![]);
    let profile = TableProfiler::new().profile(&empty, None).unwrap();
    assert_eq!(profile.column_profiles["c"].cardinality, Cardinality::None);
}

#[test]
fn iqr_outlier_is_flagged() {
    // 11 tame values and one far outlier
    let mut values: Vec<i64> = (1..=11).collect();
    values.push(500);
    let rows = values.into_iter().map(|v| json!({"amount": v})).collect();
    let snapshot = TableSnapshot::new(
        "payments",
        vec![ColumnSchema::new("amount", "REAL")],
        rows,
    );

    let profile = TableProfiler::new().profile(&snapshot, None).unwrap();
    let anomalies = &profile.column_profiles["amount"].anomalies;

    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].kind, AnomalyKind::StatisticalOutlier);
    assert_eq!(anomalies[0].count, Some(1));
    assert!(anomalies[0].description.contains("outliers detected outside"));
}

#[test]
fn age_rule_flags_out_of_range_values() {
    let rows = [25, -5, 150, 40]
        .iter()
        .map(|v| json!({"age": v}))
        .collect();
    let snapshot = TableSnapshot::new("people", vec![ColumnSchema::new("age", "INTEGER")], rows);

    let profile = TableProfiler::new().profile(&snapshot, None).unwrap();
    let anomalies = &profile.column_profiles["age"].anomalies;

    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].kind, AnomalyKind::BusinessRuleViolation);
    assert_eq!(anomalies[0].severity, Severity::High);
    assert_eq!(anomalies[0].count, Some(2));
}

#[test]
fn fk_candidate_confirmed_against_sibling_table() {
    let mut schema = SchemaMap::new();
    schema.insert(
        "shop.customers".to_string(),
        TableMeta::new(vec![SchemaColumn {
            name: "id".to_string(),
            declared_type: "INTEGER".to_string(),
            primary_key: true,
        }]),
    );

    let profile = TableProfiler::new()
        .profile(&orders_snapshot(), Some(&schema))
        .unwrap();

    let candidate = profile
        .relationships
        .iter()
        .find(|r| r.column == "customer_id")
        .expect("customer_id candidate retained");

    assert_eq!(candidate.references_table, "customer");
    assert_eq!(candidate.confidence, 1.0);
    assert_eq!(candidate.detection_method, DetectionMethod::SchemaConfirmed);
}

#[test]
fn pii_recommendation_lists_all_affected_columns() {
    let snapshot = TableSnapshot::new(
        "contacts",
        vec![
            ColumnSchema::new("id", "INTEGER").primary_key(),
            ColumnSchema::new("email", "TEXT"),
            ColumnSchema::new("phone", "TEXT"),
        ],
        vec![
            json!({"id": 1, "email": "a@example.com", "phone": "555-123-4567"}),
            json!({"id": 2, "email": "b@example.com", "phone": "555-987-6543"}),
        ],
    );

    let profile = TableProfiler::new().profile(&snapshot, None).unwrap();

    let masking: Vec<_> = profile
        .actionable_recommendations
        .iter()
        .filter(|r| r.category == RecommendationCategory::Security)
        .collect();

    assert_eq!(masking.len(), 1);
    assert_eq!(masking[0].priority, Priority::High);
    assert!(masking[0].action.contains("email"));
    assert!(masking[0].action.contains("phone"));
}

#[test]
fn semantic_types_in_realistic_table() {
    let profile = TableProfiler::new().profile(&orders_snapshot(), None).unwrap();

    assert_eq!(
        profile.column_profiles["id"].semantic_type,
        SemanticType::Identifier
    );
    assert_eq!(
        profile.column_profiles["price"].semantic_type,
        SemanticType::FinancialAmount
    );
    assert_eq!(
        profile.column_profiles["status"].semantic_type,
        SemanticType::OperationalStatus
    );
    assert_eq!(
        profile.column_profiles["created_at"].semantic_type,
        SemanticType::Temporal
    );
}

#[test]
fn trends_cover_temporal_columns() {
    let profile = TableProfiler::new().profile(&orders_snapshot(), None).unwrap();
    assert!(profile.trends.contains_key("created_at_span"));
}

#[test]
fn schema_wide_resolution_builds_edges_across_databases() {
    let mut schema = SchemaMap::new();
    schema.insert(
        "customer_db.customers".to_string(),
        TableMeta::new(vec![
            SchemaColumn {
                name: "id".to_string(),
                declared_type: "INTEGER".to_string(),
                primary_key: true,
            },
            SchemaColumn {
                name: "email".to_string(),
                declared_type: "TEXT".to_string(),
                primary_key: false,
            },
        ]),
    );
    schema.insert(
        "sales_db.orders".to_string(),
        TableMeta::new(vec![
            SchemaColumn {
                name: "id".to_string(),
                declared_type: "INTEGER".to_string(),
                primary_key: true,
            },
            SchemaColumn {
                name: "customer_id".to_string(),
                declared_type: "INTEGER".to_string(),
                primary_key: false,
            },
            SchemaColumn {
                name: "product_id".to_string(),
                declared_type: "INTEGER".to_string(),
                primary_key: false,
            },
        ]),
    );

    resolve_foreign_keys(&mut schema);

    // customer_id resolves; product_id has no target and is dropped silently
    let orders = &schema["sales_db.orders"];
    assert_eq!(orders.foreign_keys.len(), 1);
    assert_eq!(orders.foreign_keys[0].to_table, "customers");

    let edges = relationship_edges(&schema);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, "sales_db.orders");
    assert_eq!(edges[0].target, "customer_db.customers");
    assert!(edges[0].label.contains("(1:N)"));
}

#[test]
fn partial_failure_contract_batch_level() {
    // A batch where one snapshot is rejected still profiles the others
    let good = orders_snapshot();
    let bad = TableSnapshot::new("broken", vec![], vec![]);

    let profiles = TableProfiler::new().profile_all(&[good, bad], None);

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].table_name, "orders");
}
