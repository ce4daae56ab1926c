//! Target-platform naming validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::EnhancedColumn;

/// Reserved words rejected as column names on every platform.
pub const RESERVED_WORDS: [&str; 40] = [
    "ALL", "ALTER", "AND", "AS", "BETWEEN", "BY", "CASE", "COLUMN", "CREATE", "CROSS", "DATE",
    "DELETE", "DISTINCT", "DROP", "ELSE", "EXISTS", "FROM", "GROUP", "HAVING", "IN", "INDEX",
    "INSERT", "INTO", "IS", "JOIN", "LIKE", "NOT", "NULL", "OR", "ORDER", "SELECT", "TABLE",
    "THEN", "TIMESTAMP", "UNION", "UPDATE", "USER", "VALUES", "WHEN", "WHERE",
];

/// Identifier rules of a target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRules {
    pub max_identifier_length: usize,
    pub case_sensitive: bool,
}

/// Migration target platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPlatform {
    Snowflake,
    BigQuery,
    Other(String),
}

impl TargetPlatform {
    /// Resolves a platform name case-insensitively.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("snowflake") {
            Self::Snowflake
        } else if trimmed.eq_ignore_ascii_case("bigquery") {
            Self::BigQuery
        } else {
            Self::Other(trimmed.to_string())
        }
    }

    /// Identifier rules for the platform.
    pub fn rules(&self) -> PlatformRules {
        match self {
            TargetPlatform::Snowflake => PlatformRules {
                max_identifier_length: 255,
                case_sensitive: false,
            },
            TargetPlatform::BigQuery => PlatformRules {
                max_identifier_length: 300,
                case_sensitive: true,
            },
            TargetPlatform::Other(_) => PlatformRules {
                max_identifier_length: 255,
                case_sensitive: false,
            },
        }
    }
}

impl std::fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetPlatform::Snowflake => write!(f, "Snowflake"),
            TargetPlatform::BigQuery => write!(f, "BigQuery"),
            TargetPlatform::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Outcome of validating suggested column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingReport {
    pub valid: bool,
    pub platform: String,
    pub rules: PlatformRules,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(name))
}

/// Validates names against a target platform.
///
/// Reserved words, empty names and case-insensitive duplicates are errors
/// and make the report invalid. Overlong names, leading or trailing
/// underscores and characters outside `[A-Za-z0-9_]` are warnings.
///
/// # Example
/// ```rust
/// use schemalift_core::reporting::{TargetPlatform, validate_column_names};
///
/// let report = validate_column_names(["SELECT", "order_id"], &TargetPlatform::Snowflake);
/// assert!(!report.valid);
/// assert_eq!(report.errors.len(), 1);
/// ```
pub fn validate_column_names<I, S>(names: I, platform: &TargetPlatform) -> NamingReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let rules = platform.rules();
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut reported_duplicates = HashSet::new();

    for name in names {
        let name = name.as_ref();

        if name.trim().is_empty() {
            errors.push("Column name is empty".to_string());
            continue;
        }

        let length = name.chars().count();
        if length > rules.max_identifier_length {
            warnings.push(format!(
                "Column '{}' exceeds {} maximum identifier length ({} > {})",
                name, platform, length, rules.max_identifier_length
            ));
        }

        if is_reserved(name) {
            errors.push(format!("Column '{}' is a reserved word", name));
        }

        let folded = name.to_lowercase();
        if !seen.insert(folded.clone()) && reported_duplicates.insert(folded) {
            errors.push(format!("Duplicate column name '{}'", name));
        }

        if name.starts_with('_') || name.ends_with('_') {
            warnings.push(format!("Column '{}' has leading/trailing underscores", name));
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            warnings.push(format!("Column '{}' contains special characters", name));
        }
    }

    NamingReport {
        valid: errors.is_empty(),
        platform: platform.to_string(),
        rules,
        warnings,
        errors,
    }
}

/// Validates the suggested names of an enriched schema.
pub fn validate_schema_names(columns: &[EnhancedColumn], platform: &TargetPlatform) -> NamingReport {
    validate_column_names(
        columns.iter().map(|column| column.suggested_name.as_str()),
        platform,
    )
}
