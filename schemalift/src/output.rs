//! File output operations for enrichment results.
//!
//! An enrichment report bundles the run itself with every derived view
//! (project summary, checklist, naming report, glossary) so downstream
//! commands can work from a single file.

use std::path::Path;

use chrono::{DateTime, Utc};
use schemalift_core::{
    EnrichmentError, EnrichmentRun, ProjectContext, Result,
    reporting::{
        GlossaryEntry, NamingReport, ProjectSummary, TargetPlatform, build_glossary,
        migration_checklist, validate_schema_names,
    },
};
use serde::{Deserialize, Serialize};

/// Everything produced by one `enrich` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ProjectSummary,
    pub checklist: Vec<String>,
    pub naming: NamingReport,
    pub glossary: Vec<GlossaryEntry>,
    pub run: EnrichmentRun,
}

impl EnrichmentReport {
    /// Derives every report view from a finished run.
    pub fn new(run: EnrichmentRun, context: &ProjectContext) -> Self {
        let platform = TargetPlatform::from_name(&context.target);

        Self {
            generated_at: Utc::now(),
            summary: ProjectSummary::from_schema(&run.columns, context),
            checklist: migration_checklist(&run.columns),
            naming: validate_schema_names(&run.columns, &platform),
            glossary: build_glossary(&run.columns, &context.industry),
            run,
        }
    }
}

/// Saves a report as pretty-printed JSON.
///
/// # Errors
///
/// Returns a serialization error if the report cannot be encoded, or an I/O
/// error if the file cannot be written.
pub async fn save_report(report: &EnrichmentReport, output_path: &Path) -> Result<()> {
    let json_data = serde_json::to_string_pretty(report)
        .map_err(|e| EnrichmentError::serialization("JSON serialization", e))?;

    save_json(&json_data, output_path).await
}

/// Saves JSON data to file.
pub async fn save_json(json_data: &str, output_path: &Path) -> Result<()> {
    tokio::fs::write(output_path, json_data)
        .await
        .map_err(|e| {
            EnrichmentError::io(format!("Failed to write to {}", output_path.display()), e)
        })?;
    Ok(())
}

/// Loads a report previously written by [`save_report`].
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or a serialization error
/// if it does not hold an enrichment report.
pub async fn load_report(path: &Path) -> Result<EnrichmentReport> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| EnrichmentError::io(format!("Failed to read {}", path.display()), e))?;

    serde_json::from_str(&json).map_err(|e| {
        EnrichmentError::serialization(
            format!("{} is not an enrichment report", path.display()),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalift_core::{ColumnRecord, SchemaEnricher};

    fn heuristic_report() -> EnrichmentReport {
        let context = ProjectContext::for_industry("Retail/E-commerce").with_target("BigQuery");
        let schema = vec![
            ColumnRecord::new("CUST_ID", "integer").with_completeness(100.0),
            ColumnRecord::new("ORD_AMT", "float").with_completeness(97.5),
        ];
        let run = SchemaEnricher::with_defaults()
            .enhance_heuristically(&schema, &context)
            .unwrap();
        EnrichmentReport::new(run, &context)
    }

    #[test]
    fn test_report_derives_views() {
        let report = heuristic_report();

        assert_eq!(report.naming.platform, "BigQuery");
        assert_eq!(report.checklist.len(), 4);
        assert_eq!(report.glossary.len(), 2);
        assert_eq!(report.summary.schema_metrics.total_columns, 2);
        assert_eq!(report.run.model, "heuristic");
    }

    #[tokio::test]
    async fn test_save_and_load_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enriched.json");
        let report = heuristic_report();

        save_report(&report, &path).await.unwrap();
        let loaded = load_report(&path).await.unwrap();

        assert_eq!(loaded.run.columns.len(), 2);
        assert_eq!(loaded.run.columns[0].suggested_name, "customer_id");
        assert_eq!(loaded.summary, report.summary);
    }

    #[tokio::test]
    async fn test_load_rejects_column_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("columns.json");
        tokio::fs::write(&path, r#"[{"column_name": "A", "data_type": "string"}]"#)
            .await
            .unwrap();

        let error = load_report(&path).await.unwrap_err();
        assert!(matches!(error, EnrichmentError::Serialization { .. }));
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("enriched.json");

        let error = save_json("{}", &path).await.unwrap_err();
        assert!(matches!(error, EnrichmentError::Io { .. }));
    }
}
