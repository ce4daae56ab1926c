//! Prompt construction for schema enrichment.
//!
//! Three strategies of increasing terseness are used as a chunk is retried:
//! a comprehensive prompt with full column analysis, a simplified prompt with
//! names, types and a few samples, and a basic prompt that only lists names
//! with a naive rename hint. Every strategy demands a bare JSON object whose
//! `enhanced_columns` array has exactly one entry per submitted column.

use serde_json::Value;

use crate::enrichment::heuristic_column_name;
use crate::industry::IndustryContextTable;
use crate::models::{ColumnRecord, ProjectContext};
use crate::options::EnhancementOptions;

/// Default number of sample values embedded per column in the comprehensive prompt.
pub const DEFAULT_MAX_SAMPLE_VALUES: usize = 5;

/// Sample values embedded per column in the simplified prompt.
const SIMPLIFIED_SAMPLE_VALUES: usize = 3;

/// Fields every returned column object must carry in the comprehensive format.
pub const RESPONSE_FIELDS: [&str; 11] = [
    "original_name",
    "suggested_name",
    "business_description",
    "industry_context",
    "compliance_notes",
    "data_quality_rules",
    "transformation_suggestions",
    "business_importance",
    "potential_kpis",
    "modernization_notes",
    "confidence_score",
];

const COMPREHENSIVE_TEMPLATE: &str = r#"{
  "enhanced_columns": [
    {
      "original_name": "original_column_name",
      "suggested_name": "business_friendly_name",
      "business_description": "One to two sentence business description",
      "industry_context": "How the column is used in this industry",
      "compliance_notes": "Applicable regulations or an empty string",
      "data_quality_rules": ["rule1", "rule2"],
      "transformation_suggestions": ["suggestion1"],
      "business_importance": "High|Medium|Low",
      "potential_kpis": ["kpi1"],
      "modernization_notes": "Notes for the target platform",
      "confidence_score": 0.85
    }
  ]
}"#;

const SIMPLIFIED_TEMPLATE: &str = r#"{
  "enhanced_columns": [
    {
      "original_name": "original_column_name",
      "suggested_name": "business_friendly_name",
      "business_description": "Short business description",
      "data_quality_rules": ["rule1"],
      "business_importance": "High|Medium|Low",
      "confidence_score": 0.8
    }
  ]
}"#;

const BASIC_TEMPLATE: &str = r#"{
  "enhanced_columns": [
    {
      "original_name": "original_column_name",
      "suggested_name": "business_friendly_name",
      "business_description": "Short business description"
    }
  ]
}"#;

/// Prompt variant selected by retry attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PromptStrategy {
    /// Full column analysis, industry context and per-option objectives
    Comprehensive,
    /// Names, types and up to three samples
    Simplified,
    /// Column names with a naive rename hint
    Basic,
}

impl PromptStrategy {
    /// Strategy for a 1-based attempt number: 1 is comprehensive, 2 is
    /// simplified, 3 and later are basic.
    pub fn for_attempt(attempt: usize) -> Self {
        match attempt {
            0 | 1 => Self::Comprehensive,
            2 => Self::Simplified,
            _ => Self::Basic,
        }
    }
}

impl std::fmt::Display for PromptStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptStrategy::Comprehensive => write!(f, "comprehensive"),
            PromptStrategy::Simplified => write!(f, "simplified"),
            PromptStrategy::Basic => write!(f, "basic"),
        }
    }
}

/// Builds enrichment prompts for a chunk of columns.
#[derive(Debug, Clone)]
pub struct PromptBuilder<'a> {
    industries: &'a IndustryContextTable,
    max_sample_values: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Creates a builder backed by an industry context table.
    pub fn new(industries: &'a IndustryContextTable) -> Self {
        Self {
            industries,
            max_sample_values: DEFAULT_MAX_SAMPLE_VALUES,
        }
    }

    /// Builder method to set how many samples the comprehensive prompt embeds.
    pub fn with_max_sample_values(mut self, max_sample_values: usize) -> Self {
        self.max_sample_values = max_sample_values;
        self
    }

    /// Renders the prompt for a strategy.
    pub fn build(
        &self,
        strategy: PromptStrategy,
        columns: &[ColumnRecord],
        options: &EnhancementOptions,
        context: &ProjectContext,
    ) -> String {
        match strategy {
            PromptStrategy::Comprehensive => self.comprehensive(columns, options, context),
            PromptStrategy::Simplified => self.simplified(columns, context),
            PromptStrategy::Basic => self.basic(columns, context),
        }
    }

    fn comprehensive(
        &self,
        columns: &[ColumnRecord],
        options: &EnhancementOptions,
        context: &ProjectContext,
    ) -> String {
        let count = columns.len();
        let mut prompt = format!(
            "You are a senior data engineer modernizing a legacy schema from {} to {}.\n\
             Project: {}\n\
             Industry: {}\n",
            context.source, context.target, context.name, context.industry
        );

        if let Some(profile) = self.industries.lookup(&context.industry) {
            prompt.push_str("\nINDUSTRY CONTEXT:\n");
            prompt.push_str(&format!(
                "- Common naming patterns: {}\n",
                profile.common_patterns.join(", ")
            ));
            prompt.push_str(&format!(
                "- Compliance requirements: {}\n",
                profile.compliance_requirements.join(", ")
            ));
            prompt.push_str(&format!(
                "- Key business metrics: {}\n",
                profile.key_metrics.join(", ")
            ));
        }

        prompt.push_str(&format!("\nCOLUMNS TO ANALYZE ({}):\n", count));
        for (position, column) in columns.iter().enumerate() {
            prompt.push_str(&self.describe_column(position.saturating_add(1), column));
        }

        prompt.push_str("\nOBJECTIVES:\n");
        if options.is_empty() {
            prompt.push_str(
                "1. Provide a business-friendly name and description for every column.\n",
            );
        } else {
            for (position, option) in options.selected().iter().enumerate() {
                prompt.push_str(&format!(
                    "{}. {}\n",
                    position.saturating_add(1),
                    option.instruction()
                ));
            }
        }

        prompt.push_str(&format!(
            "\nRESPONSE FORMAT:\n\
             Return a single JSON object whose \"enhanced_columns\" array contains exactly {count} \
             objects, one per column, in the same order as listed above. Each object must contain \
             these {} fields: {}.\n\n{}\n",
            RESPONSE_FIELDS.len(),
            RESPONSE_FIELDS.join(", "),
            COMPREHENSIVE_TEMPLATE
        ));
        prompt.push_str(&strict_rules(count));
        prompt
    }

    fn describe_column(&self, position: usize, column: &ColumnRecord) -> String {
        let mut text = format!("\n{}. Column: '{}'\n", position, column.column_name);
        text.push_str(&format!("   - Data Type: {}\n", column.data_type));
        text.push_str(&format!(
            "   - Completeness: {}%\n",
            format_number(column.completeness_pct)
        ));
        match column.unique_count {
            Some(unique) => text.push_str(&format!(
                "   - Unique Values: {} of {}\n",
                unique, column.total_count
            )),
            None => text.push_str(&format!(
                "   - Unique Values: unknown of {}\n",
                column.total_count
            )),
        }
        text.push_str(&format!(
            "   - Sample Values: {}\n",
            format_samples(&column.sample_values, self.max_sample_values)
        ));
        text.push_str(&format!(
            "   - Potential PII: {}\n",
            yes_no(column.potential_pii)
        ));
        text.push_str(&format!(
            "   - Potential Business Key: {}\n",
            yes_no(column.potential_business_key)
        ));

        if column.is_numeric() {
            if let (Some(min), Some(max)) = (&column.min_value, &column.max_value) {
                text.push_str(&format!(
                    "   - Range: {} to {}\n",
                    format_value(min),
                    format_value(max)
                ));
            }
        } else if column.is_string() {
            if let Some(avg_length) = column.avg_length {
                text.push_str(&format!(
                    "   - Avg Length: {} chars\n",
                    format_number(avg_length)
                ));
            }
        }

        if let Some(pattern) = column
            .data_pattern
            .as_deref()
            .filter(|p| !p.trim().is_empty())
        {
            text.push_str(&format!("   - Detected Pattern: {}\n", pattern));
        }

        text
    }

    fn simplified(&self, columns: &[ColumnRecord], context: &ProjectContext) -> String {
        let count = columns.len();
        let mut prompt = format!(
            "Suggest business-friendly names and short descriptions for these {} columns \
             from a {} dataset.\n\nCOLUMNS:\n",
            count, context.industry
        );
        for (position, column) in columns.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. '{}' ({}) samples: {}\n",
                position.saturating_add(1),
                column.column_name,
                column.data_type,
                format_samples(&column.sample_values, SIMPLIFIED_SAMPLE_VALUES)
            ));
        }
        prompt.push_str(&format!(
            "\nReturn exactly {count} objects in \"enhanced_columns\", in the same order:\n{}\n",
            SIMPLIFIED_TEMPLATE
        ));
        prompt.push_str(&strict_rules(count));
        prompt
    }

    fn basic(&self, columns: &[ColumnRecord], context: &ProjectContext) -> String {
        let count = columns.len();
        let mut prompt = format!(
            "Rename these {} legacy {} columns to readable snake_case names and describe each \
             in one sentence.\n\nCOLUMNS:\n",
            count, context.industry
        );
        for (position, column) in columns.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. {} (hint: {})\n",
                position.saturating_add(1),
                column.column_name,
                heuristic_column_name(&column.column_name)
            ));
        }
        prompt.push_str(&format!(
            "\nOnly original_name, suggested_name and business_description are required; other \
             fields may be omitted.\nReturn exactly {count} objects in \"enhanced_columns\", in \
             the same order:\n{}\n",
            BASIC_TEMPLATE
        ));
        prompt.push_str(&strict_rules(count));
        prompt
    }
}

fn strict_rules(count: usize) -> String {
    format!(
        "\nRULES:\n\
         - Respond ONLY with a single valid JSON object.\n\
         - Do NOT use markdown, code fences (```), or triple quotes.\n\
         - Do NOT add explanations or any text before or after the JSON.\n\
         - \"enhanced_columns\" must contain exactly {count} entries, no more and no fewer.\n"
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_samples(samples: &[Value], limit: usize) -> String {
    let rendered: Vec<String> = samples.iter().take(limit).map(Value::to_string).collect();
    format!("[{}]", rendered.join(", "))
}
