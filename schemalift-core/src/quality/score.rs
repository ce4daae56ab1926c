//! Data quality score.

use crate::models::ColumnRecord;

const BASE_SCORE: f64 = 0.5;
const COMPLETENESS_WEIGHT: f64 = 0.42;
const UNIQUENESS_WEIGHT: f64 = 0.35;
const UNGOVERNED_PII_PENALTY: f64 = 0.3;

/// Unrounded, unclamped additive score.
///
/// Starts at 0.5, adds up to 0.42 for completeness and up to 0.35 for
/// uniqueness (only when a distinct count is known), and subtracts 0.3 for a
/// PII column without any data quality rule. The result can leave [0.0, 1.0]
/// for complete, highly unique columns or for out-of-range inputs.
pub fn raw_quality_score(record: &ColumnRecord, quality_rules: &[String]) -> f64 {
    let mut score = BASE_SCORE;

    score += COMPLETENESS_WEIGHT * (record.completeness_pct / 100.0);

    if let Some(ratio) = record.uniqueness_ratio() {
        score += UNIQUENESS_WEIGHT * ratio;
    }

    if record.potential_pii && quality_rules.is_empty() {
        score -= UNGOVERNED_PII_PENALTY;
    }

    score
}

/// Data quality score rounded to two decimals.
///
/// With `clamp` set the score is limited to [0.0, 1.0] before rounding;
/// without it the legacy additive value is kept as is.
pub fn data_quality_score(record: &ColumnRecord, quality_rules: &[String], clamp: bool) -> f64 {
    let raw = raw_quality_score(record, quality_rules);
    let bounded = if clamp { raw.clamp(0.0, 1.0) } else { raw };
    round2(bounded)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
