//! Merging model output onto source column records.
//!
//! Entries are matched by position. Every field read from the model is
//! coerced leniently: scalars become text, a bare string becomes a one-item
//! list, numeric strings become numbers. Missing fields get safe defaults.

use serde_json::{Map, Value};

use crate::models::{BusinessImportance, ColumnRecord, EnhancedColumn, ProjectContext};
use crate::quality::ColumnScorer;

/// Confidence assumed when the model does not report one.
pub const DEFAULT_AI_CONFIDENCE: f64 = 0.5;

/// Merges order-aligned model entries onto the original chunk.
///
/// Callers must ensure both slices have the same length; extra entries on
/// either side are ignored.
pub fn merge_chunk(
    entries: &[Value],
    originals: &[ColumnRecord],
    context: &ProjectContext,
    scorer: &ColumnScorer,
) -> Vec<EnhancedColumn> {
    originals
        .iter()
        .zip(entries)
        .map(|(original, entry)| merge_column(entry, original, context, scorer))
        .collect()
}

/// Merges a single model entry onto its source record.
pub fn merge_column(
    entry: &Value,
    original: &ColumnRecord,
    context: &ProjectContext,
    scorer: &ColumnScorer,
) -> EnhancedColumn {
    let empty = Map::new();
    let fields = entry.as_object().unwrap_or(&empty);

    if let Some(reported) = text_field(fields, "original_name")
        && !reported.eq_ignore_ascii_case(&original.column_name)
    {
        tracing::debug!(
            "Model reported original_name '{}' for column '{}'; keeping positional match",
            reported,
            original.column_name
        );
    }

    let suggested_name = text_field(fields, "suggested_name")
        .filter(|name| !name.trim().is_empty())
        .map(|name| name.trim().to_string())
        .unwrap_or_else(|| original.column_name.clone());

    let mut column = EnhancedColumn {
        original: original.clone(),
        original_name: original.column_name.clone(),
        suggested_name,
        business_description: text_field(fields, "business_description").unwrap_or_default(),
        industry_context: text_field(fields, "industry_context").unwrap_or_default(),
        compliance_notes: text_field(fields, "compliance_notes").unwrap_or_default(),
        data_quality_rules: list_field(fields, "data_quality_rules"),
        transformation_suggestions: list_field(fields, "transformation_suggestions"),
        business_importance: text_field(fields, "business_importance")
            .map(|label| BusinessImportance::from_loose(&label))
            .unwrap_or_default(),
        potential_kpis: list_field(fields, "potential_kpis"),
        modernization_notes: text_field(fields, "modernization_notes").unwrap_or_default(),
        confidence_score: confidence_field(fields),
        enhanced: true,
        industry: context.industry.clone(),
        fallback_used: false,
        data_quality_score: 0.0,
        migration_complexity: Default::default(),
    };
    scorer.score(&mut column);
    column
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(scalar_text)
}

fn list_field(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn confidence_field(fields: &Map<String, Value>) -> f64 {
    let reported = match fields.get("confidence_score") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };

    match reported {
        Some(value) if value.is_finite() => value.clamp(0.0, 1.0),
        _ => DEFAULT_AI_CONFIDENCE,
    }
}
