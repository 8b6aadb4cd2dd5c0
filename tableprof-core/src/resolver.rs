//! Schema-wide foreign-key resolution across attached databases.
//!
//! This is the multi-table counterpart to per-table relationship inference,
//! used when rendering relationship diagrams across several databases. The
//! interface is explicitly two-phase: callers first collect every table's
//! schema into one [`SchemaMap`] keyed by qualified name
//! (`database_alias.table_name`), then call [`resolve_foreign_keys`] once
//! over the merged map. There is no implicit global state; the barrier
//! between phases belongs to the caller.
//!
//! Edges always carry a `1:N` annotation. The resolver never infers 1:1 or
//! N:N relationships; unresolved `_id` columns are dropped silently.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One column of a table schema as collected from the source database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaColumn {
    /// Column name
    pub name: String,
    /// Declared storage type
    #[serde(rename = "type")]
    pub declared_type: String,
    /// Whether the column is (part of) the primary key
    #[serde(default)]
    pub primary_key: bool,
}

/// A resolved or declared foreign-key reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Referencing column on the source table
    pub from: String,
    /// Referenced table (unqualified name)
    pub to_table: String,
    /// Referenced column
    pub to_column: String,
}

/// Schema metadata for one table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableMeta {
    /// Columns in table order
    pub columns: Vec<SchemaColumn>,
    /// Declared plus inferred foreign keys
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyRef>,
}

impl TableMeta {
    /// Creates metadata with no foreign keys.
    pub fn new(columns: Vec<SchemaColumn>) -> Self {
        Self {
            columns,
            foreign_keys: Vec::new(),
        }
    }

    fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

/// Ordered map from qualified table name to its metadata.
///
/// Insertion order is significant: candidate search walks the map in order
/// and the first confirmed target wins.
pub type SchemaMap = IndexMap<String, TableMeta>;

/// A directed relationship edge for diagram rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// Qualified source table
    pub source: String,
    /// Qualified target table
    pub target: String,
    /// Edge label naming the column pair and cardinality
    pub label: String,
}

/// Finds the qualified table whose name resolves the given base entity.
///
/// Matches `alias.{base}` and `alias.{base}s`; unqualified keys match by
/// equality on the same forms.
pub(crate) fn find_target_table<'a>(schema: &'a SchemaMap, base: &str) -> Option<&'a str> {
    let singular_suffix = format!(".{}", base);
    let plural_suffix = format!(".{}s", base);
    let plural = format!("{}s", base);

    schema.keys().find_map(|key| {
        let matches = key.ends_with(&singular_suffix)
            || key.ends_with(&plural_suffix)
            || key == base
            || key == &plural;
        matches.then_some(key.as_str())
    })
}

/// Strips the qualifying database alias from a table key.
pub(crate) fn short_table_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Infers cross-table foreign keys from `_id` naming conventions.
///
/// For each non-primary-key column ending in `_id`, the base entity name is
/// matched against every other table (singular and plural); a match is
/// confirmed only when the target table carries the same column name, a
/// generic `id`, or `{base}_id`. Confirmed references are appended to the
/// source table's `foreign_keys`; already-present references are left alone
/// so declared keys are never duplicated.
pub fn resolve_foreign_keys(schema: &mut SchemaMap) {
    let additions = collect_inferred_keys(schema);

    for (table_key, reference) in additions {
        if let Some(meta) = schema.get_mut(&table_key) {
            tracing::debug!(
                "inferred foreign key {}.{} -> {}",
                short_table_name(&table_key),
                reference.from,
                reference.to_table
            );
            meta.foreign_keys.push(reference);
        }
    }
}

/// Scans the whole map for confirmable `_id` references.
fn collect_inferred_keys(schema: &SchemaMap) -> Vec<(String, ForeignKeyRef)> {
    let mut additions: Vec<(String, ForeignKeyRef)> = Vec::new();

    for (table_key, meta) in schema.iter() {
        for column in &meta.columns {
            if column.primary_key || !column.name.ends_with("_id") {
                continue;
            }
            let base = column.name.trim_end_matches("_id");

            let Some(target_key) = find_target_table(schema, base) else {
                continue;
            };
            let Some(target) = schema.get(target_key) else {
                continue;
            };

            let fallback_id = format!("{}_id", base);
            let confirmed = target.has_column(&column.name)
                || target.has_column("id")
                || target.has_column(&fallback_id);
            if !confirmed {
                continue;
            }

            let reference = ForeignKeyRef {
                from: column.name.clone(),
                to_table: short_table_name(target_key).to_string(),
                to_column: column.name.clone(),
            };

            let already_present = meta
                .foreign_keys
                .iter()
                .any(|fk| fk.from == reference.from && fk.to_table == reference.to_table);
            if !already_present {
                additions.push((table_key.clone(), reference));
            }
        }
    }

    additions
}

/// Derives directed diagram edges from the foreign keys in a schema map.
///
/// Each edge is labeled with the participating column pair and the fixed
/// `1:N` cardinality assumption. References whose target table is absent
/// from the map yield no edge.
pub fn relationship_edges(schema: &SchemaMap) -> Vec<RelationshipEdge> {
    let mut edges = Vec::new();

    for (table_key, meta) in schema.iter() {
        for fk in &meta.foreign_keys {
            let target_suffix = format!(".{}", fk.to_table);
            let target = schema
                .keys()
                .find(|key| key.ends_with(&target_suffix) || *key == &fk.to_table);

            if let Some(target_key) = target {
                edges.push(RelationshipEdge {
                    source: table_key.clone(),
                    target: target_key.clone(),
                    label: format!("{} -> {} (1:N)", fk.from, fk.to_column),
                });
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, declared_type: &str) -> SchemaColumn {
        SchemaColumn {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            primary_key: false,
        }
    }

    fn key_column(name: &str) -> SchemaColumn {
        SchemaColumn {
            name: name.to_string(),
            declared_type: "INTEGER".to_string(),
            primary_key: true,
        }
    }

    fn sample_schema() -> SchemaMap {
        let mut schema = SchemaMap::new();
        schema.insert(
            "shop.customers".to_string(),
            TableMeta::new(vec![key_column("id"), column("email", "TEXT")]),
        );
        schema.insert(
            "shop.orders".to_string(),
            TableMeta::new(vec![
                key_column("id"),
                column("customer_id", "INTEGER"),
                column("total", "REAL"),
            ]),
        );
        schema
    }

    #[test]
    fn test_plural_table_resolution() {
        let mut schema = sample_schema();
        resolve_foreign_keys(&mut schema);

        let orders = &schema["shop.orders"];
        assert_eq!(orders.foreign_keys.len(), 1);
        let fk = &orders.foreign_keys[0];
        assert_eq!(fk.from, "customer_id");
        assert_eq!(fk.to_table, "customers");
        assert_eq!(fk.to_column, "customer_id");
    }

    #[test]
    fn test_singular_table_resolution() {
        let mut schema = SchemaMap::new();
        schema.insert(
            "db.customer".to_string(),
            TableMeta::new(vec![key_column("id")]),
        );
        schema.insert(
            "db.orders".to_string(),
            TableMeta::new(vec![key_column("id"), column("customer_id", "INTEGER")]),
        );

        resolve_foreign_keys(&mut schema);
        assert_eq!(schema["db.orders"].foreign_keys.len(), 1);
        assert_eq!(schema["db.orders"].foreign_keys[0].to_table, "customer");
    }

    #[test]
    fn test_unconfirmed_target_is_dropped() {
        let mut schema = SchemaMap::new();
        // Target exists by name but has no id-like column to confirm against
        schema.insert(
            "db.customers".to_string(),
            TableMeta::new(vec![column("email", "TEXT")]),
        );
        schema.insert(
            "db.orders".to_string(),
            TableMeta::new(vec![column("customer_id", "INTEGER")]),
        );

        resolve_foreign_keys(&mut schema);
        assert!(schema["db.orders"].foreign_keys.is_empty());
    }

    #[test]
    fn test_missing_target_is_dropped_silently() {
        let mut schema = SchemaMap::new();
        schema.insert(
            "db.orders".to_string(),
            TableMeta::new(vec![column("warehouse_id", "INTEGER")]),
        );

        resolve_foreign_keys(&mut schema);
        assert!(schema["db.orders"].foreign_keys.is_empty());
    }

    #[test]
    fn test_primary_key_columns_are_skipped() {
        let mut schema = SchemaMap::new();
        schema.insert(
            "db.customers".to_string(),
            TableMeta::new(vec![key_column("id")]),
        );
        // customer_id is itself the primary key here, not a reference
        schema.insert(
            "db.profiles".to_string(),
            TableMeta::new(vec![key_column("customer_id")]),
        );

        resolve_foreign_keys(&mut schema);
        assert!(schema["db.profiles"].foreign_keys.is_empty());
    }

    #[test]
    fn test_cross_database_resolution() {
        let mut schema = SchemaMap::new();
        schema.insert(
            "customer_db.customers".to_string(),
            TableMeta::new(vec![key_column("id")]),
        );
        schema.insert(
            "sales_db.orders".to_string(),
            TableMeta::new(vec![key_column("id"), column("customer_id", "INTEGER")]),
        );

        resolve_foreign_keys(&mut schema);

        let edges = relationship_edges(&schema);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "sales_db.orders");
        assert_eq!(edges[0].target, "customer_db.customers");
        assert_eq!(edges[0].label, "customer_id -> customer_id (1:N)");
    }

    #[test]
    fn test_first_match_wins_over_map_order() {
        let mut schema = SchemaMap::new();
        schema.insert(
            "a.customers".to_string(),
            TableMeta::new(vec![key_column("id")]),
        );
        schema.insert(
            "b.customers".to_string(),
            TableMeta::new(vec![key_column("id")]),
        );
        schema.insert(
            "a.orders".to_string(),
            TableMeta::new(vec![column("customer_id", "INTEGER")]),
        );

        resolve_foreign_keys(&mut schema);

        let edges = relationship_edges(&schema);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target, "a.customers");
    }

    #[test]
    fn test_declared_keys_are_not_duplicated() {
        let mut schema = sample_schema();
        schema["shop.orders"].foreign_keys.push(ForeignKeyRef {
            from: "customer_id".to_string(),
            to_table: "customers".to_string(),
            to_column: "id".to_string(),
        });

        resolve_foreign_keys(&mut schema);
        assert_eq!(schema["shop.orders"].foreign_keys.len(), 1);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut schema = sample_schema();
        resolve_foreign_keys(&mut schema);
        resolve_foreign_keys(&mut schema);
        assert_eq!(schema["shop.orders"].foreign_keys.len(), 1);
    }

    #[test]
    fn test_schema_map_serde_roundtrip() {
        let mut schema = sample_schema();
        resolve_foreign_keys(&mut schema);

        let json = serde_json::to_string(&schema).unwrap();
        let back: SchemaMap = serde_json::from_str(&json).unwrap();

        // Insertion order survives the round trip
        let keys: Vec<_> = back.keys().collect();
        assert_eq!(keys, vec!["shop.customers", "shop.orders"]);
        assert_eq!(back["shop.orders"].foreign_keys.len(), 1);
    }

    #[test]
    fn test_edge_for_missing_target_is_omitted() {
        let mut schema = SchemaMap::new();
        let mut meta = TableMeta::new(vec![column("vendor_id", "INTEGER")]);
        meta.foreign_keys.push(ForeignKeyRef {
            from: "vendor_id".to_string(),
            to_table: "vendors".to_string(),
            to_column: "id".to_string(),
        });
        schema.insert("db.products".to_string(), meta);

        assert!(relationship_edges(&schema).is_empty());
    }
}
