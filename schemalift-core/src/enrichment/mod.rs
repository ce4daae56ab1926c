//! Schema enrichment.
//!
//! This module turns profiled column records into enhanced columns:
//! - **Retry ladder**: an explicit state machine that escalates from the
//!   comprehensive to the basic prompt and never drops a chunk
//! - **Merge**: lenient overlay of model output onto the source records
//! - **Fallback**: deterministic heuristic enrichment used once a chunk's
//!   attempts are exhausted

mod config;
mod enricher;
mod fallback;
mod ladder;
mod merge;

pub use config::{
    ConfigValidationError, DEFAULT_MAX_RETRIES, EnrichmentConfig, MAX_RETRIES_LIMIT,
};
pub use enricher::{ChunkReport, EnrichmentRun, SchemaEnricher};
pub use fallback::{
    FALLBACK_CONFIDENCE, fallback_chunk, fallback_column, heuristic_column_name,
    heuristic_description,
};
pub use ladder::{
    AttemptAssessment, AttemptFailure, AttemptState, ChunkOutcome, Transition, assess_attempt,
    transition,
};
pub use merge::{DEFAULT_AI_CONFIDENCE, merge_chunk, merge_column};
