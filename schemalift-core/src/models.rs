//! Core data models for column metadata and enrichment output.
//!
//! Column records arrive from an external profiling step and are treated as
//! read-only. Enhanced columns are built once per enrichment run and carry the
//! original record plus the AI (or heuristic) annotations and derived scores.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profiled metadata for a single source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub column_name: String,
    pub data_type: String,
    #[serde(default)]
    pub completeness_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_count: Option<u64>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_count: Option<u64>,
    #[serde(default)]
    pub sample_values: Vec<Value>,
    #[serde(default)]
    pub potential_pii: bool,
    #[serde(default)]
    pub potential_business_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_length: Option<f64>,
}

impl ColumnRecord {
    /// Creates a record with only a name and type; all statistics start empty.
    pub fn new(column_name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            data_type: data_type.into(),
            completeness_pct: 0.0,
            unique_count: None,
            total_count: 0,
            null_count: None,
            sample_values: Vec::new(),
            potential_pii: false,
            potential_business_key: false,
            data_pattern: None,
            min_value: None,
            max_value: None,
            avg_length: None,
        }
    }

    /// Builder method to set completeness percentage (0-100).
    pub fn with_completeness(mut self, completeness_pct: f64) -> Self {
        self.completeness_pct = completeness_pct;
        self
    }

    /// Builder method to set unique and total counts.
    pub fn with_counts(mut self, unique_count: u64, total_count: u64) -> Self {
        self.unique_count = Some(unique_count);
        self.total_count = total_count;
        self
    }

    /// Builder method to set sample values.
    pub fn with_samples<I, V>(mut self, samples: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.sample_values = samples.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to flag the column as potential PII.
    pub fn with_pii(mut self, potential_pii: bool) -> Self {
        self.potential_pii = potential_pii;
        self
    }

    /// Builder method to flag the column as a potential business key.
    pub fn with_business_key(mut self, potential_business_key: bool) -> Self {
        self.potential_business_key = potential_business_key;
        self
    }

    /// Builder method to set the detected data pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.data_pattern = Some(pattern.into());
        self
    }

    /// Builder method to set the numeric range.
    pub fn with_range(mut self, min_value: impl Into<Value>, max_value: impl Into<Value>) -> Self {
        self.min_value = Some(min_value.into());
        self.max_value = Some(max_value.into());
        self
    }

    /// Builder method to set the average string length.
    pub fn with_avg_length(mut self, avg_length: f64) -> Self {
        self.avg_length = Some(avg_length);
        self
    }

    /// True for `integer` and `float` columns.
    pub fn is_numeric(&self) -> bool {
        matches!(self.data_type.to_ascii_lowercase().as_str(), "integer" | "float")
    }

    /// True for `string` columns.
    pub fn is_string(&self) -> bool {
        self.data_type.eq_ignore_ascii_case("string")
    }

    /// Ratio of distinct values to total values, if a distinct count is known.
    pub fn uniqueness_ratio(&self) -> Option<f64> {
        self.unique_count
            .map(|unique| unique as f64 / self.total_count.max(1) as f64)
    }
}

/// Business importance reported for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessImportance {
    High,
    #[default]
    Medium,
    Low,
}

impl BusinessImportance {
    /// Parses a loosely formatted importance label, defaulting to `Medium`.
    ///
    /// Labels such as `"high - primary identifier"` are accepted.
    pub fn from_loose(label: &str) -> Self {
        let label = label.trim().to_ascii_lowercase();
        if label.starts_with("high") {
            Self::High
        } else if label.starts_with("low") {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

impl std::fmt::Display for BusinessImportance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessImportance::High => write!(f, "High"),
            BusinessImportance::Medium => write!(f, "Medium"),
            BusinessImportance::Low => write!(f, "Low"),
        }
    }
}

/// Qualitative estimate of the transformation work a column requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MigrationComplexity {
    #[default]
    Low,
    Medium,
    High,
}

impl MigrationComplexity {
    /// Maps an additive complexity score onto a label.
    ///
    /// 0 is Low, 1-2 is Medium, 3 and above is High.
    pub fn from_score(score: usize) -> Self {
        match score {
            0 => Self::Low,
            1 | 2 => Self::Medium,
            _ => Self::High,
        }
    }
}

impl std::fmt::Display for MigrationComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationComplexity::Low => write!(f, "Low"),
            MigrationComplexity::Medium => write!(f, "Medium"),
            MigrationComplexity::High => write!(f, "High"),
        }
    }
}

/// Project-level context supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContext {
    #[serde(default = "default_industry")]
    pub industry: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_industry() -> String {
    "General".to_string()
}

fn default_name() -> String {
    "Schema Migration Project".to_string()
}

fn default_source() -> String {
    "Legacy System".to_string()
}

fn default_target() -> String {
    "Snowflake".to_string()
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self {
            industry: default_industry(),
            name: default_name(),
            source: default_source(),
            target: default_target(),
        }
    }
}

impl ProjectContext {
    /// Creates a context for an industry with default name, source and target.
    pub fn for_industry(industry: impl Into<String>) -> Self {
        let industry = industry.into();
        Self {
            industry: if industry.trim().is_empty() {
                default_industry()
            } else {
                industry
            },
            ..Self::default()
        }
    }

    /// Builder method to set the project name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder method to set the source system.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Builder method to set the target platform.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }
}

/// A column record enriched with business metadata and derived scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedColumn {
    #[serde(flatten)]
    pub original: ColumnRecord,
    pub original_name: String,
    pub suggested_name: String,
    pub business_description: String,
    pub industry_context: String,
    pub compliance_notes: String,
    pub data_quality_rules: Vec<String>,
    pub transformation_suggestions: Vec<String>,
    pub business_importance: BusinessImportance,
    pub potential_kpis: Vec<String>,
    pub modernization_notes: String,
    pub confidence_score: f64,
    pub enhanced: bool,
    pub industry: String,
    pub fallback_used: bool,
    pub data_quality_score: f64,
    pub migration_complexity: MigrationComplexity,
}

impl EnhancedColumn {
    /// Name of the source column this entry was produced for.
    pub fn column_name(&self) -> &str {
        &self.original.column_name
    }

    /// Whether the suggested name differs from the source name.
    pub fn is_renamed(&self) -> bool {
        self.suggested_name != self.original.column_name
    }
}
