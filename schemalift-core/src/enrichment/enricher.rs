//! Chunked schema enrichment orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::chunking::{Chunk, plan_chunks};
use crate::error::EnrichmentError;
use crate::industry::IndustryContextTable;
use crate::invoker::ModelInvoker;
use crate::models::{ColumnRecord, EnhancedColumn, ProjectContext};
use crate::options::EnhancementOptions;
use crate::prompt::{PromptBuilder, PromptStrategy};
use crate::quality::ColumnScorer;

use super::config::EnrichmentConfig;
use super::fallback::fallback_chunk;
use super::ladder::{
    AttemptAssessment, AttemptFailure, AttemptState, ChunkOutcome, Transition, assess_attempt,
    transition,
};
use super::merge::merge_chunk;

/// Per-chunk record of how enrichment went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkReport {
    /// 1-based chunk index
    pub index: usize,
    pub size: usize,
    /// Model attempts made (0 in heuristic-only runs)
    pub attempts: usize,
    pub failures: Vec<AttemptFailure>,
    pub outcome: ChunkOutcome,
}

/// Result of an enrichment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRun {
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// One entry per input column, in input order
    pub columns: Vec<EnhancedColumn>,
    pub chunk_reports: Vec<ChunkReport>,
}

impl EnrichmentRun {
    /// Number of chunks that fell back to heuristic enrichment.
    pub fn fallback_chunk_count(&self) -> usize {
        self.chunk_reports
            .iter()
            .filter(|report| report.outcome == ChunkOutcome::FellBack)
            .count()
    }

    /// Total model attempts across all chunks.
    pub fn total_attempts(&self) -> usize {
        self.chunk_reports.iter().map(|report| report.attempts).sum()
    }

    /// Consumes the run, returning the enriched columns.
    pub fn into_columns(self) -> Vec<EnhancedColumn> {
        self.columns
    }
}

/// Enriches column metadata chunk by chunk through a [`ModelInvoker`].
///
/// Chunks are processed strictly in order, one invocation at a time. Every
/// chunk is either merged from model output or enriched heuristically once
/// its attempts are exhausted, so the output always holds one column per
/// input column in input order. Only a structurally incompatible response
/// aborts a run.
///
/// # Example
/// ```rust
/// use schemalift_core::enrichment::SchemaEnricher;
/// use schemalift_core::invoker::ScriptedInvoker;
/// use schemalift_core::models::{ColumnRecord, ProjectContext};
/// use schemalift_core::options::EnhancementOptions;
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let enricher = SchemaEnricher::with_defaults();
/// let schema = vec![ColumnRecord::new("ORD_DT", "date")];
///
/// // An invoker with nothing scripted fails every call
/// let invoker = ScriptedInvoker::default();
/// let columns = enricher
///     .enhance_schema(&schema, &EnhancementOptions::all(), &ProjectContext::default(), &invoker)
///     .await
///     .unwrap();
///
/// assert_eq!(columns[0].suggested_name, "ord_date");
/// assert!(columns[0].fallback_used);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct SchemaEnricher {
    industries: IndustryContextTable,
    config: EnrichmentConfig,
}

impl SchemaEnricher {
    /// Creates an enricher with an industry table and configuration.
    ///
    /// # Errors
    /// Returns a configuration error if `config` fails validation.
    pub fn new(industries: IndustryContextTable, config: EnrichmentConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| EnrichmentError::configuration(e.to_string()))?;
        Ok(Self { industries, config })
    }

    /// Creates an enricher with the built-in industry table and default configuration.
    pub fn with_defaults() -> Self {
        Self {
            industries: IndustryContextTable::builtin(),
            config: EnrichmentConfig::default(),
        }
    }

    /// Builder method to override the chunk size for subsequent runs.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.config = self.config.with_chunk_size(chunk_size);
        self
    }

    /// Returns a reference to the enrichment configuration.
    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Returns a reference to the industry context table.
    pub fn industries(&self) -> &IndustryContextTable {
        &self.industries
    }

    fn scorer(&self) -> ColumnScorer {
        ColumnScorer::new(self.config.clamp_quality_score)
    }

    /// Enriches a schema and reports how each chunk was handled.
    ///
    /// # Errors
    /// Returns [`EnrichmentError::SchemaShape`] if the model returns a
    /// structurally incompatible response, or a configuration error for an
    /// invalid chunk size.
    pub async fn enhance(
        &self,
        schema: &[ColumnRecord],
        options: &EnhancementOptions,
        context: &ProjectContext,
        invoker: &dyn ModelInvoker,
    ) -> Result<EnrichmentRun> {
        let started_at = Utc::now();
        let chunks = plan_chunks(schema, self.config.chunk_size)?;
        let builder = PromptBuilder::new(&self.industries)
            .with_max_sample_values(self.config.max_sample_values);
        let scorer = self.scorer();

        tracing::info!(
            "Enriching {} columns in {} chunks with model '{}'",
            schema.len(),
            chunks.len(),
            invoker.model_name()
        );

        let mut columns = Vec::with_capacity(schema.len());
        let mut chunk_reports = Vec::with_capacity(chunks.len());

        for chunk in &chunks {
            let (enhanced, report) = self
                .process_chunk(chunk, options, context, invoker, &builder, &scorer)
                .await?;
            columns.extend(enhanced);
            chunk_reports.push(report);
        }

        let run = EnrichmentRun {
            model: invoker.model_name().to_string(),
            started_at,
            completed_at: Utc::now(),
            columns,
            chunk_reports,
        };

        tracing::info!(
            "Enrichment complete: {} columns, {} model attempts, {} chunks fell back",
            run.columns.len(),
            run.total_attempts(),
            run.fallback_chunk_count()
        );

        Ok(run)
    }

    /// Enriches a schema, returning only the enriched columns.
    ///
    /// # Errors
    /// See [`SchemaEnricher::enhance`].
    pub async fn enhance_schema(
        &self,
        schema: &[ColumnRecord],
        options: &EnhancementOptions,
        context: &ProjectContext,
        invoker: &dyn ModelInvoker,
    ) -> Result<Vec<EnhancedColumn>> {
        self.enhance(schema, options, context, invoker)
            .await
            .map(EnrichmentRun::into_columns)
    }

    /// Enriches a schema with heuristics only, without any model call.
    ///
    /// # Errors
    /// Returns a configuration error for an invalid chunk size.
    pub fn enhance_heuristically(
        &self,
        schema: &[ColumnRecord],
        context: &ProjectContext,
    ) -> Result<EnrichmentRun> {
        let started_at = Utc::now();
        let chunks = plan_chunks(schema, self.config.chunk_size)?;
        let scorer = self.scorer();

        tracing::info!(
            "Enriching {} columns heuristically in {} chunks",
            schema.len(),
            chunks.len()
        );

        let mut columns = Vec::with_capacity(schema.len());
        let mut chunk_reports = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            columns.extend(fallback_chunk(chunk.columns, context, &scorer));
            chunk_reports.push(ChunkReport {
                index: chunk.index,
                size: chunk.len(),
                attempts: 0,
                failures: Vec::new(),
                outcome: ChunkOutcome::FellBack,
            });
        }

        Ok(EnrichmentRun {
            model: "heuristic".to_string(),
            started_at,
            completed_at: Utc::now(),
            columns,
            chunk_reports,
        })
    }

    async fn process_chunk(
        &self,
        chunk: &Chunk<'_>,
        options: &EnhancementOptions,
        context: &ProjectContext,
        invoker: &dyn ModelInvoker,
        builder: &PromptBuilder<'_>,
        scorer: &ColumnScorer,
    ) -> Result<(Vec<EnhancedColumn>, ChunkReport)> {
        tracing::info!(
            "Processing chunk {}/{} with {} columns",
            chunk.index,
            chunk.total,
            chunk.len()
        );

        let mut state = AttemptState::Pending;
        let mut attempts = 0usize;
        let mut failures = Vec::new();
        let mut enhanced = Vec::new();

        let outcome = loop {
            match transition(state, attempts, self.config.max_retries) {
                Transition::Retry { next_attempt } => {
                    attempts = next_attempt;
                    let strategy = PromptStrategy::for_attempt(attempts);
                    let prompt = builder.build(strategy, chunk.columns, options, context);

                    tracing::debug!(
                        "Chunk {} attempt {}/{}: {} prompt, {} chars",
                        chunk.index,
                        attempts,
                        self.config.max_retries,
                        strategy,
                        prompt.len()
                    );
                    tracing::trace!("Chunk {} prompt:\n{}", chunk.index, prompt);

                    let result = invoker.invoke(&prompt).await;

                    match assess_attempt(&result, chunk.index, chunk.len())? {
                        AttemptAssessment::Accepted(entries) => {
                            enhanced = merge_chunk(entries, chunk.columns, context, scorer);
                            state = AttemptState::Succeeded;
                        }
                        AttemptAssessment::Rejected {
                            state: failed,
                            error,
                        } => {
                            tracing::warn!(
                                "Chunk {} attempt {}/{} failed: {}",
                                chunk.index,
                                attempts,
                                self.config.max_retries,
                                error
                            );
                            failures.push(AttemptFailure {
                                attempt: attempts,
                                strategy,
                                state: failed,
                                reason: error.to_string(),
                            });
                            state = failed;
                        }
                    }
                }
                Transition::Fallback => {
                    tracing::error!(
                        "Chunk {} failed after {} attempts; using heuristic enrichment",
                        chunk.index,
                        attempts
                    );
                    enhanced = fallback_chunk(chunk.columns, context, scorer);
                    break ChunkOutcome::FellBack;
                }
                Transition::Done => {
                    tracing::info!(
                        "Chunk {}/{} enhanced on attempt {}",
                        chunk.index,
                        chunk.total,
                        attempts
                    );
                    break ChunkOutcome::Enhanced;
                }
            }
        };

        let report = ChunkReport {
            index: chunk.index,
            size: chunk.len(),
            attempts,
            failures,
            outcome,
        };
        Ok((enhanced, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::{InvocationResult, ScriptedInvoker};
    use serde_json::{Value, json};

    fn columns(names: &[&str]) -> Vec<ColumnRecord> {
        names
            .iter()
            .map(|name| ColumnRecord::new(*name, "string"))
            .collect()
    }

    fn response_for(names: &[&str]) -> InvocationResult {
        let entries: Vec<Value> = names
            .iter()
            .map(|name| {
                json!({
                    "original_name": name,
                    "suggested_name": name.to_lowercase(),
                    "business_description": format!("Description of {}", name),
                    "confidence_score": 0.9
                })
            })
            .collect();
        InvocationResult::json(json!({ "enhanced_columns": entries }))
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EnrichmentConfig {
            max_retries: 0,
            ..EnrichmentConfig::default()
        };
        let err = SchemaEnricher::new(IndustryContextTable::builtin(), config).unwrap_err();
        assert!(matches!(err, EnrichmentError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let enricher = SchemaEnricher::with_defaults();
        let schema = columns(&["A", "B"]);
        let invoker = ScriptedInvoker::new([response_for(&["A", "B"])]);

        let run = enricher
            .enhance(
                &schema,
                &EnhancementOptions::all(),
                &ProjectContext::default(),
                &invoker,
            )
            .await
            .unwrap();

        assert_eq!(run.columns.len(), 2);
        assert_eq!(run.columns[0].suggested_name, "a");
        assert!(!run.columns[0].fallback_used);
        assert_eq!(run.chunk_reports[0].attempts, 1);
        assert_eq!(run.chunk_reports[0].outcome, ChunkOutcome::Enhanced);
        assert_eq!(run.model, "scripted");
        assert_eq!(invoker.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failures_escalate_prompt_then_fall_back() {
        let enricher = SchemaEnricher::with_defaults();
        let schema = columns(&["CUST_NBR"]);
        let invoker = ScriptedInvoker::new([
            InvocationResult::failure("timeout"),
            InvocationResult::invalid_json("nope", "expected value"),
            response_for(&["CUST_NBR", "EXTRA"]),
        ]);

        let run = enricher
            .enhance(
                &schema,
                &EnhancementOptions::all(),
                &ProjectContext::default(),
                &invoker,
            )
            .await
            .unwrap();

        let report = &run.chunk_reports[0];
        assert_eq!(report.attempts, 3);
        assert_eq!(report.outcome, ChunkOutcome::FellBack);
        assert_eq!(
            report.failures.iter().map(|f| f.state).collect::<Vec<_>>(),
            vec![
                AttemptState::ModelCallFailed,
                AttemptState::JsonInvalid,
                AttemptState::CountMismatch
            ]
        );
        assert_eq!(
            report.failures.iter().map(|f| f.strategy).collect::<Vec<_>>(),
            vec![
                PromptStrategy::Comprehensive,
                PromptStrategy::Simplified,
                PromptStrategy::Basic
            ]
        );

        let column = &run.columns[0];
        assert!(column.fallback_used);
        assert_eq!(column.suggested_name, "customer_number");
        assert_eq!(run.fallback_chunk_count(), 1);
    }

    #[test]
    fn test_heuristic_run_makes_no_calls() {
        let enricher = SchemaEnricher::with_defaults().with_chunk_size(2);
        let schema = columns(&["A_DT", "B_AMT", "C_CD"]);

        let run = enricher
            .enhance_heuristically(&schema, &ProjectContext::default())
            .unwrap();

        assert_eq!(run.columns.len(), 3);
        assert_eq!(run.chunk_reports.len(), 2);
        assert_eq!(run.total_attempts(), 0);
        assert!(run.columns.iter().all(|c| c.fallback_used));
        assert_eq!(run.model, "heuristic");
    }

    #[tokio::test]
    async fn test_empty_schema_yields_empty_run() {
        let enricher = SchemaEnricher::with_defaults();
        let invoker = ScriptedInvoker::default();

        let run = enricher
            .enhance(
                &[],
                &EnhancementOptions::all(),
                &ProjectContext::default(),
                &invoker,
            )
            .await
            .unwrap();

        assert!(run.columns.is_empty());
        assert!(run.chunk_reports.is_empty());
        assert_eq!(invoker.call_count(), 0);
    }
}
