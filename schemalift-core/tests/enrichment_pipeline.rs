//! End-to-end enrichment pipeline tests.
//!
//! This test suite covers:
//! - Chunk planning and ordering across a full run
//! - Prompt escalation on count mismatches
//! - Heuristic fallback after exhausted attempts
//! - Immediate failure on structurally incompatible responses
//! - Reporting over the enriched output
//!
//! A scripted invoker stands in for the model service, so no network is needed.

use proptest::prelude::*;
use schemalift_core::{
    ChunkOutcome, ColumnRecord, EnhancementOptions, EnrichmentConfig, EnrichmentError,
    IndustryContextTable, InvocationResult, ProjectContext, Result, SchemaEnricher,
    enrichment::AttemptState,
    invoker::ScriptedInvoker,
    prompt::PromptStrategy,
    reporting::{
        ProjectSummary, TargetPlatform, build_glossary, migration_checklist,
        validate_schema_names,
    },
};
use serde_json::{Value, json};

/// Builds `count` columns named COL_0, COL_1, ...
fn columns(count: usize) -> Vec<ColumnRecord> {
    (0..count)
        .map(|i| {
            ColumnRecord::new(format!("COL_{}", i), "string")
                .with_completeness(90.0)
                .with_counts(50, 100)
        })
        .collect()
}

/// A well-formed response for a slice of columns.
fn response_for(chunk: &[ColumnRecord]) -> InvocationResult {
    let entries: Vec<Value> = chunk
        .iter()
        .map(|column| {
            json!({
                "original_name": column.column_name,
                "suggested_name": column.column_name.to_lowercase(),
                "business_description": format!("Business meaning of {}", column.column_name),
                "data_quality_rules": ["not null"],
                "business_importance": "Medium",
                "confidence_score": 0.8
            })
        })
        .collect();
    InvocationResult::json(json!({ "enhanced_columns": entries }))
}

fn ota_context() -> ProjectContext {
    ProjectContext::for_industry("Online Travel Agency (OTA)")
        .with_name("Booking Platform Migration")
        .with_target("Snowflake")
}

// =============================================================================
// Ordering and chunking
// =============================================================================

/// 14 columns with chunk size 6 take three invocations of sizes 6, 6 and 2
#[tokio::test]
async fn test_pipeline_fourteen_columns_three_chunks() -> Result<()> {
    let schema = columns(14);
    let invoker = ScriptedInvoker::new([
        response_for(&schema[0..6]),
        response_for(&schema[6..12]),
        response_for(&schema[12..14]),
    ]);
    let enricher = SchemaEnricher::with_defaults();

    let run = enricher
        .enhance(&schema, &EnhancementOptions::all(), &ota_context(), &invoker)
        .await?;

    assert_eq!(invoker.call_count(), 3);
    assert_eq!(
        run.chunk_reports.iter().map(|r| r.size).collect::<Vec<_>>(),
        vec![6, 6, 2]
    );
    assert_eq!(run.columns.len(), schema.len());
    for (input, output) in schema.iter().zip(&run.columns) {
        assert_eq!(output.original_name, input.column_name);
        assert!(output.enhanced);
        assert!(!output.fallback_used);
        assert_eq!(output.industry, "Online Travel Agency (OTA)");
    }

    // Each prompt only lists its own chunk
    let prompts = invoker.prompts();
    assert!(prompts[2].contains("COL_12"));
    assert!(!prompts[2].contains("COL_0'"));
    Ok(())
}

// =============================================================================
// Retry ladder
// =============================================================================

/// Five entries for a six-column chunk trigger a retry with the simplified prompt
#[tokio::test]
async fn test_pipeline_count_mismatch_retries_with_simplified_prompt() -> Result<()> {
    let schema = columns(6);
    let invoker = ScriptedInvoker::new([response_for(&schema[0..5]), response_for(&schema)]);
    let enricher = SchemaEnricher::with_defaults();

    let run = enricher
        .enhance(&schema, &EnhancementOptions::all(), &ota_context(), &invoker)
        .await?;

    let report = &run.chunk_reports[0];
    assert_eq!(report.attempts, 2);
    assert_eq!(report.outcome, ChunkOutcome::Enhanced);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].state, AttemptState::CountMismatch);
    assert!(report.failures[0].reason.contains("expected 6 columns"));

    let prompts = invoker.prompts();
    assert!(prompts[0].contains("COLUMNS TO ANALYZE (6)"));
    assert!(prompts[1].contains("Suggest business-friendly names"));
    assert!(!prompts[1].contains("COLUMNS TO ANALYZE"));
    assert!(run.columns.iter().all(|c| !c.fallback_used));
    Ok(())
}

/// Exhausted attempts fall back to heuristics without surfacing an error
#[tokio::test]
async fn test_pipeline_exhausted_chunk_falls_back() -> Result<()> {
    let mut schema = columns(6);
    schema.push(
        ColumnRecord::new("BKNG_ID_NBR", "string")
            .with_completeness(98.0)
            .with_counts(9900, 10000),
    );
    // First chunk succeeds, second chunk fails on every attempt
    let invoker = ScriptedInvoker::new([
        response_for(&schema[0..6]),
        InvocationResult::failure("HTTP 503"),
        InvocationResult::invalid_json("Sure! Here it is", "expected value at line 1 column 1"),
        InvocationResult::failure("HTTP 503"),
    ]);
    let enricher = SchemaEnricher::with_defaults();

    let run = enricher
        .enhance(&schema, &EnhancementOptions::all(), &ota_context(), &invoker)
        .await?;

    assert_eq!(invoker.call_count(), 4);
    assert_eq!(run.fallback_chunk_count(), 1);
    assert_eq!(run.chunk_reports[1].outcome, ChunkOutcome::FellBack);
    assert_eq!(
        run.chunk_reports[1]
            .failures
            .iter()
            .map(|f| f.strategy)
            .collect::<Vec<_>>(),
        vec![
            PromptStrategy::Comprehensive,
            PromptStrategy::Simplified,
            PromptStrategy::Basic
        ]
    );

    let booking = &run.columns[6];
    assert!(booking.fallback_used);
    assert_eq!(booking.suggested_name, "bkng_id");
    assert_eq!(
        booking.business_description,
        "Order/booking information for Online Travel Agency (OTA)"
    );
    assert_eq!(booking.confidence_score, 0.6);

    // Basic prompt carries the naive rename hint
    assert!(invoker.prompts()[3].contains("BKNG_ID_NBR (hint: bkng_id)"));
    Ok(())
}

/// A configured retry budget bounds the attempts per chunk
#[tokio::test]
async fn test_pipeline_respects_max_retries() -> Result<()> {
    let schema = columns(2);
    let config = EnrichmentConfig::new().with_max_retries(1);
    let enricher = SchemaEnricher::new(IndustryContextTable::builtin(), config)?;
    let invoker = ScriptedInvoker::new([InvocationResult::failure("refused")]);

    let run = enricher
        .enhance(&schema, &EnhancementOptions::all(), &ProjectContext::default(), &invoker)
        .await?;

    assert_eq!(invoker.call_count(), 1);
    assert_eq!(run.chunk_reports[0].outcome, ChunkOutcome::FellBack);
    Ok(())
}

/// A response without the enhanced_columns array aborts the run immediately
#[tokio::test]
async fn test_pipeline_shape_error_is_not_retried() {
    let schema = columns(8);
    let invoker = ScriptedInvoker::new([
        response_for(&schema[0..6]),
        InvocationResult::json(json!({ "columns": [] })),
        response_for(&schema[6..8]),
    ]);
    let enricher = SchemaEnricher::with_defaults();

    let err = enricher
        .enhance(&schema, &EnhancementOptions::all(), &ProjectContext::default(), &invoker)
        .await
        .unwrap_err();

    assert!(matches!(err, EnrichmentError::SchemaShape { chunk_index: 2, .. }));
    assert_eq!(invoker.call_count(), 2);
}

/// Oddly typed field values are coerced or defaulted, never a shape error
#[tokio::test]
async fn test_pipeline_coerces_oddly_typed_fields() -> Result<()> {
    let schema = columns(3);
    let invoker = ScriptedInvoker::new([InvocationResult::json(json!({
        "enhanced_columns": [
            { "original_name": "COL_0", "suggested_name": "col_zero" },
            { "suggested_name": true },
            { "potential_kpis": { "a": 1 }, "confidence_score": false }
        ]
    }))]);

    let run = SchemaEnricher::with_defaults()
        .enhance(&schema, &EnhancementOptions::all(), &ProjectContext::default(), &invoker)
        .await?;

    assert_eq!(invoker.call_count(), 1);
    assert_eq!(run.columns.len(), 3);
    assert_eq!(run.chunk_reports[0].outcome, ChunkOutcome::Enhanced);
    assert_eq!(run.columns[0].suggested_name, "col_zero");
    assert_eq!(run.columns[1].suggested_name, "true");
    assert!(run.columns[2].potential_kpis.is_empty());
    assert_eq!(run.columns[2].suggested_name, "COL_2");
    assert_eq!(run.columns[2].confidence_score, 0.5);
    Ok(())
}

/// Repaired model output flows through the same path as clean JSON
#[tokio::test]
async fn test_pipeline_accepts_repaired_output() -> Result<()> {
    let schema = vec![ColumnRecord::new("TOT_AMT", "float")];
    let raw = "Here is the JSON you asked for:\n```json\n{\"enhanced_columns\": [{\"original_name\": \"TOT_AMT\", \"suggested_name\": \"total_amount\", \"confidence_score\": \"0.85\"}]}\n```";
    let invoker = ScriptedInvoker::new([schemalift_core::parse_structured_response(raw)]);

    let columns = SchemaEnricher::with_defaults()
        .enhance_schema(&schema, &EnhancementOptions::all(), &ProjectContext::default(), &invoker)
        .await?;

    assert_eq!(columns[0].suggested_name, "total_amount");
    assert_eq!(columns[0].confidence_score, 0.85);
    Ok(())
}

// =============================================================================
// Reporting over a full run
// =============================================================================

#[tokio::test]
async fn test_pipeline_reports() -> Result<()> {
    let schema = vec![
        ColumnRecord::new("GUEST_EMAIL", "string")
            .with_completeness(95.0)
            .with_pii(true),
        ColumnRecord::new("BKNG_DT", "date").with_completeness(100.0),
    ];
    let context = ota_context();
    let run = SchemaEnricher::with_defaults().enhance_heuristically(&schema, &context)?;

    let checklist = migration_checklist(&run.columns);
    assert!(checklist[0].starts_with("Review 1 columns"));

    let naming = validate_schema_names(&run.columns, &TargetPlatform::from_name(&context.target));
    assert!(naming.valid, "unexpected errors: {:?}", naming.errors);

    let summary = ProjectSummary::from_schema(&run.columns, &context);
    assert_eq!(summary.schema_metrics.fallback_columns, 2);
    assert_eq!(summary.migration_readiness.documentation_score, 1.0);

    let glossary = build_glossary(&run.columns, &context.industry);
    assert_eq!(glossary[1].business_name, "bkng_date");
    Ok(())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Output length and order match the input whatever the model does
    #[test]
    fn prop_pipeline_preserves_length_and_order(
        total in 0usize..20,
        chunk_size in 1usize..8,
        outcomes in proptest::collection::vec(0u8..4, 0..40),
    ) {
        let schema = columns(total);
        let script: Vec<InvocationResult> = outcomes
            .iter()
            .map(|outcome| match outcome {
                0 => InvocationResult::failure("down"),
                1 => InvocationResult::invalid_json("?", "bad"),
                2 => InvocationResult::json(json!({ "enhanced_columns": [] })),
                _ => response_for(&schema[..schema.len().min(chunk_size)]),
            })
            .collect();
        let invoker = ScriptedInvoker::new(script);
        let enricher = SchemaEnricher::with_defaults().with_chunk_size(chunk_size);

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let run = runtime
            .block_on(enricher.enhance(
                &schema,
                &EnhancementOptions::all(),
                &ProjectContext::default(),
                &invoker,
            ))
            .unwrap();

        prop_assert_eq!(run.columns.len(), schema.len());
        for (input, output) in schema.iter().zip(&run.columns) {
            prop_assert_eq!(&output.original_name, &input.column_name);
            prop_assert!((0.0..=1.0).contains(&output.data_quality_score));
        }
    }
}
