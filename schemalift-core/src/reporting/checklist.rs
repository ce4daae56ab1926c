//! Migration checklist.

use serde::{Deserialize, Serialize};

use crate::models::{EnhancedColumn, MigrationComplexity};

/// Column counts behind the migration checklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistCounts {
    pub pii_columns: usize,
    pub high_complexity_columns: usize,
    pub columns_with_quality_rules: usize,
    pub columns_with_kpis: usize,
}

impl ChecklistCounts {
    /// Tallies an enriched schema.
    pub fn from_schema(columns: &[EnhancedColumn]) -> Self {
        columns.iter().fold(Self::default(), |mut counts, column| {
            if column.original.potential_pii {
                counts.pii_columns = counts.pii_columns.saturating_add(1);
            }
            if column.migration_complexity == MigrationComplexity::High {
                counts.high_complexity_columns = counts.high_complexity_columns.saturating_add(1);
            }
            if !column.data_quality_rules.is_empty() {
                counts.columns_with_quality_rules = counts.columns_with_quality_rules.saturating_add(1);
            }
            if !column.potential_kpis.is_empty() {
                counts.columns_with_kpis = counts.columns_with_kpis.saturating_add(1);
            }
            counts
        })
    }

    /// Human-readable checklist lines, one per count.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!(
                "Review {} columns flagged as potential PII for masking and access policies",
                self.pii_columns
            ),
            format!(
                "Plan detailed transformations for {} high-complexity columns",
                self.high_complexity_columns
            ),
            format!(
                "Implement data quality tests for {} columns with quality rules",
                self.columns_with_quality_rules
            ),
            format!(
                "Wire {} columns into business KPI reporting",
                self.columns_with_kpis
            ),
        ]
    }
}

/// Checklist lines for an enriched schema.
///
/// # Example
/// ```rust
/// use schemalift_core::reporting::migration_checklist;
///
/// let lines = migration_checklist(&[]);
/// assert_eq!(lines.len(), 4);
/// assert!(lines[0].starts_with("Review 0 columns"));
/// ```
pub fn migration_checklist(columns: &[EnhancedColumn]) -> Vec<String> {
    ChecklistCounts::from_schema(columns).lines()
}
