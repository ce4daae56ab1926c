//! Project summary and migration readiness.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{BusinessImportance, EnhancedColumn, MigrationComplexity, ProjectContext};

/// Quality score above which a column counts as high quality.
const HIGH_QUALITY_THRESHOLD: f64 = 0.8;
/// Quality score below which a column needs quality work.
const LOW_QUALITY_THRESHOLD: f64 = 0.7;

/// Column-level counts of an enriched schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetrics {
    pub total_columns: usize,
    pub enhanced_columns: usize,
    pub fallback_columns: usize,
    pub pii_columns: usize,
    pub business_keys: usize,
    pub high_quality_columns: usize,
}

/// Business-facing counts of an enriched schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessImpact {
    pub high_importance_fields: usize,
    /// Distinct non-empty compliance notes
    pub compliance_requirements: usize,
    /// Columns with at least one transformation suggestion
    pub transformation_candidates: usize,
}

/// Coarse migration readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessLevel {
    High,
    Medium,
    Low,
}

impl ReadinessLevel {
    /// High above 0.8, Medium above 0.6, otherwise Low.
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            Self::High
        } else if score > 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Readiness scores, each rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationReadiness {
    pub overall_score: f64,
    pub data_quality_score: f64,
    pub complexity_score: f64,
    pub documentation_score: f64,
    pub readiness_level: ReadinessLevel,
    pub recommendations: Vec<String>,
}

impl MigrationReadiness {
    /// Assesses an enriched schema.
    ///
    /// The overall score is the mean of the average data quality score, the
    /// share of columns that are not High complexity and the share of
    /// documented columns. An empty schema scores zero everywhere.
    pub fn assess(columns: &[EnhancedColumn]) -> Self {
        if columns.is_empty() {
            return Self {
                overall_score: 0.0,
                data_quality_score: 0.0,
                complexity_score: 0.0,
                documentation_score: 0.0,
                readiness_level: ReadinessLevel::Low,
                recommendations: Vec::new(),
            };
        }

        let total = columns.len() as f64;
        let high_complexity = columns
            .iter()
            .filter(|c| c.migration_complexity == MigrationComplexity::High)
            .count();
        let undocumented = columns
            .iter()
            .filter(|c| c.business_description.trim().is_empty())
            .count();
        let low_quality = columns
            .iter()
            .filter(|c| c.data_quality_score < LOW_QUALITY_THRESHOLD)
            .count();

        let data_quality = columns.iter().map(|c| c.data_quality_score).sum::<f64>() / total;
        let complexity = 1.0 - high_complexity as f64 / total;
        let documentation = columns.len().saturating_sub(undocumented) as f64 / total;
        let overall = (data_quality + complexity + documentation) / 3.0;

        let mut recommendations = Vec::new();
        if overall < 0.8 {
            if low_quality > 0 {
                recommendations.push(format!(
                    "Improve data quality for {} columns before migration",
                    low_quality
                ));
            }
            if high_complexity > 0 {
                recommendations.push(format!(
                    "Develop detailed migration plan for {} complex transformations",
                    high_complexity
                ));
            }
            if undocumented > 0 {
                recommendations.push(format!(
                    "Add business documentation for {} columns",
                    undocumented
                ));
            }
        }

        Self {
            overall_score: round2(overall),
            data_quality_score: round2(data_quality),
            complexity_score: round2(complexity),
            documentation_score: round2(documentation),
            readiness_level: ReadinessLevel::from_score(overall),
            recommendations,
        }
    }
}

/// Project-level summary of an enriched schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project: ProjectContext,
    pub schema_metrics: SchemaMetrics,
    pub business_impact: BusinessImpact,
    pub migration_readiness: MigrationReadiness,
}

impl ProjectSummary {
    /// Summarizes an enriched schema.
    pub fn from_schema(columns: &[EnhancedColumn], context: &ProjectContext) -> Self {
        let count = |predicate: fn(&EnhancedColumn) -> bool| {
            columns.iter().filter(|c| predicate(c)).count()
        };

        let schema_metrics = SchemaMetrics {
            total_columns: columns.len(),
            enhanced_columns: count(|c| c.enhanced),
            fallback_columns: count(|c| c.fallback_used),
            pii_columns: count(|c| c.original.potential_pii),
            business_keys: count(|c| c.original.potential_business_key),
            high_quality_columns: count(|c| c.data_quality_score > HIGH_QUALITY_THRESHOLD),
        };

        let distinct_compliance: BTreeSet<&str> = columns
            .iter()
            .map(|c| c.compliance_notes.trim())
            .filter(|notes| !notes.is_empty())
            .collect();

        let business_impact = BusinessImpact {
            high_importance_fields: count(|c| c.business_importance == BusinessImportance::High),
            compliance_requirements: distinct_compliance.len(),
            transformation_candidates: count(|c| !c.transformation_suggestions.is_empty()),
        };

        Self {
            project: context.clone(),
            schema_metrics,
            business_impact,
            migration_readiness: MigrationReadiness::assess(columns),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::{fallback_column, merge_column};
    use crate::models::ColumnRecord;
    use crate::quality::ColumnScorer;
    use serde_json::json;

    fn documented(name: &str, completeness: f64) -> EnhancedColumn {
        merge_column(
            &json!({
                "suggested_name": name,
                "business_description": format!("{} description", name),
                "business_importance": "High"
            }),
            &ColumnRecord::new(name, "string").with_completeness(completeness),
            &ProjectContext::default(),
            &ColumnScorer::default(),
        )
    }

    #[test]
    fn test_empty_schema() {
        let summary = ProjectSummary::from_schema(&[], &ProjectContext::default());
        assert_eq!(summary.schema_metrics, SchemaMetrics::default());
        assert_eq!(summary.migration_readiness.overall_score, 0.0);
        assert_eq!(
            summary.migration_readiness.readiness_level,
            ReadinessLevel::Low
        );
        assert!(summary.migration_readiness.recommendations.is_empty());
    }

    #[test]
    fn test_well_documented_schema_is_ready() {
        // quality 0.92 each, no renames, no rules
        let columns = vec![documented("id", 100.0), documented("name", 100.0)];
        let readiness = MigrationReadiness::assess(&columns);

        assert_eq!(readiness.data_quality_score, 0.92);
        assert_eq!(readiness.complexity_score, 1.0);
        assert_eq!(readiness.documentation_score, 1.0);
        assert_eq!(readiness.overall_score, 0.97);
        assert_eq!(readiness.readiness_level, ReadinessLevel::High);
        assert!(readiness.recommendations.is_empty());
    }

    #[test]
    fn test_recommendations_for_weak_schema() {
        let mut undocumented = documented("notes", 0.0);
        undocumented.business_description.clear();

        let context = ProjectContext::default();
        let complex = fallback_column(
            &ColumnRecord::new("CUST_EMAIL_ADDR", "string").with_pii(true),
            &context,
            &ColumnScorer::default(),
        );

        let readiness = MigrationReadiness::assess(&[undocumented, complex]);

        // quality (0.5 + 0.5) / 2, complexity 1 - 1/2, documentation 1/2
        assert_eq!(readiness.data_quality_score, 0.5);
        assert_eq!(readiness.complexity_score, 0.5);
        assert_eq!(readiness.documentation_score, 0.5);
        assert_eq!(readiness.readiness_level, ReadinessLevel::Low);
        assert_eq!(
            readiness.recommendations,
            vec![
                "Improve data quality for 2 columns before migration",
                "Develop detailed migration plan for 1 complex transformations",
                "Add business documentation for 1 columns",
            ]
        );
    }

    #[test]
    fn test_summary_counts() {
        let context = ProjectContext::for_industry("Healthcare");
        let scorer = ColumnScorer::default();
        let ai = documented("patient_id", 100.0);
        let fallback = fallback_column(
            &ColumnRecord::new("PT_SSN", "string")
                .with_pii(true)
                .with_business_key(true),
            &context,
            &scorer,
        );

        let summary = ProjectSummary::from_schema(&[ai, fallback], &context);

        assert_eq!(summary.project.industry, "Healthcare");
        assert_eq!(summary.schema_metrics.total_columns, 2);
        assert_eq!(summary.schema_metrics.enhanced_columns, 2);
        assert_eq!(summary.schema_metrics.fallback_columns, 1);
        assert_eq!(summary.schema_metrics.pii_columns, 1);
        assert_eq!(summary.schema_metrics.business_keys, 1);
        assert_eq!(summary.schema_metrics.high_quality_columns, 1);
        assert_eq!(summary.business_impact.high_importance_fields, 1);
        assert_eq!(summary.business_impact.compliance_requirements, 1);
        assert_eq!(summary.business_impact.transformation_candidates, 1);
    }

    #[test]
    fn test_readiness_thresholds() {
        assert_eq!(ReadinessLevel::from_score(0.81), ReadinessLevel::High);
        assert_eq!(ReadinessLevel::from_score(0.8), ReadinessLevel::Medium);
        assert_eq!(ReadinessLevel::from_score(0.61), ReadinessLevel::Medium);
        assert_eq!(ReadinessLevel::from_score(0.6), ReadinessLevel::Low);
    }
}
