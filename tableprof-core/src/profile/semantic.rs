//! Semantic type classification for columns.
//!
//! Classification is name-first: an ordered keyword rule table is evaluated
//! against the lower-cased column name and the first match wins, so business
//! semantics expressed in naming convention outranks raw storage type. Only
//! when no name rule matches does the declared storage type decide between
//! NUMERIC, TEXT, and UNKNOWN. Sample values are never inspected here; format
//! checks belong to the quality assessor.

use serde::{Deserialize, Serialize};

/// Business-meaning category of a column, distinct from its storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticType {
    PiiEmail,
    PiiPhone,
    PiiName,
    PiiAddress,
    FinancialAmount,
    FinancialCurrency,
    Temporal,
    OperationalStatus,
    Categorical,
    Behavioral,
    Identifier,
    Numeric,
    Text,
    Unknown,
}

impl SemanticType {
    /// Whether this type marks personally identifiable information.
    pub fn is_pii(self) -> bool {
        matches!(
            self,
            SemanticType::PiiEmail
                | SemanticType::PiiPhone
                | SemanticType::PiiName
                | SemanticType::PiiAddress
        )
    }
}

/// Ordered keyword rules; first match wins.
const NAME_RULES: &[(&[&str], SemanticType)] = &[
    (&["email", "mail"], SemanticType::PiiEmail),
    (&["phone", "mobile", "tel"], SemanticType::PiiPhone),
    (&["name", "first_name", "last_name"], SemanticType::PiiName),
    (&["address", "street", "city", "zip"], SemanticType::PiiAddress),
    (
        &["price", "amount", "cost", "fee", "salary"],
        SemanticType::FinancialAmount,
    ),
    (&["currency", "curr"], SemanticType::FinancialCurrency),
    (
        &["date", "time", "timestamp", "created", "updated"],
        SemanticType::Temporal,
    ),
    (&["status", "state", "stage"], SemanticType::OperationalStatus),
    (&["category", "type", "class"], SemanticType::Categorical),
    (&["click", "view", "visit", "session"], SemanticType::Behavioral),
];

/// Storage-type keywords that carry numeric affinity (SQLite-style).
const NUMERIC_TYPE_KEYWORDS: &[&str] = &[
    "INT", "REAL", "FLOA", "DOUB", "NUMERIC", "DECIMAL", "BOOL",
];

/// Storage-type keywords that carry text affinity.
const TEXT_TYPE_KEYWORDS: &[&str] = &["CHAR", "CLOB", "TEXT"];

/// Classifies a column by name, falling back to its declared storage type.
pub fn classify(column_name: &str, declared_type: &str) -> SemanticType {
    let name = column_name.to_lowercase();

    for (keywords, semantic) in NAME_RULES {
        if keywords.iter().any(|k| name.contains(k)) {
            return *semantic;
        }
    }

    if name == "id" || name.ends_with("_id") {
        return SemanticType::Identifier;
    }

    let declared = declared_type.to_uppercase();
    if NUMERIC_TYPE_KEYWORDS.iter().any(|k| declared.contains(k)) {
        SemanticType::Numeric
    } else if TEXT_TYPE_KEYWORDS.iter().any(|k| declared.contains(k)) {
        SemanticType::Text
    } else {
        SemanticType::Unknown
    }
}
