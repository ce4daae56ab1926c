//! Scorer facade applied to enhanced columns.

use crate::models::EnhancedColumn;

use super::{data_quality_score, migration_complexity};

/// Applies both derived scores to enhanced columns.
#[derive(Debug, Clone, Copy)]
pub struct ColumnScorer {
    clamp_quality_score: bool,
}

impl Default for ColumnScorer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ColumnScorer {
    /// Creates a scorer; `clamp_quality_score` limits quality scores to [0.0, 1.0].
    pub fn new(clamp_quality_score: bool) -> Self {
        Self {
            clamp_quality_score,
        }
    }

    /// Recomputes `data_quality_score` and `migration_complexity` in place.
    pub fn score(&self, column: &mut EnhancedColumn) {
        column.data_quality_score = data_quality_score(
            &column.original,
            &column.data_quality_rules,
            self.clamp_quality_score,
        );
        column.migration_complexity = migration_complexity(
            &column.original,
            &column.suggested_name,
            &column.data_quality_rules,
        );
    }
}
