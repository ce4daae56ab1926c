//! Migration complexity estimate.

use crate::models::{ColumnRecord, MigrationComplexity};

/// Pattern labels that carry no transformation signal.
const TRIVIAL_PATTERNS: [&str; 3] = ["none", "unknown", "n/a"];

/// Whether a detected data pattern is worth accounting for.
pub fn has_meaningful_pattern(record: &ColumnRecord) -> bool {
    record.data_pattern.as_deref().is_some_and(|pattern| {
        let pattern = pattern.trim();
        !pattern.is_empty()
            && !TRIVIAL_PATTERNS
                .iter()
                .any(|trivial| pattern.eq_ignore_ascii_case(trivial))
    })
}

/// Additive complexity points for a column.
///
/// One point for a rename, one per data quality rule, one for PII and one
/// for a meaningful data pattern.
pub fn complexity_points(
    record: &ColumnRecord,
    suggested_name: &str,
    quality_rules: &[String],
) -> usize {
    let mut points = 0usize;

    if suggested_name != record.column_name {
        points = points.saturating_add(1);
    }
    points = points.saturating_add(quality_rules.len());
    if record.potential_pii {
        points = points.saturating_add(1);
    }
    if has_meaningful_pattern(record) {
        points = points.saturating_add(1);
    }

    points
}

/// Migration complexity label: 0 points is Low, 1-2 Medium, 3+ High.
pub fn migration_complexity(
    record: &ColumnRecord,
    suggested_name: &str,
    quality_rules: &[String],
) -> MigrationComplexity {
    MigrationComplexity::from_score(complexity_points(record, suggested_name, quality_rules))
}
