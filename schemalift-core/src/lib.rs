//! Core library for SchemaLift schema enrichment.
//!
//! This crate turns profiled column metadata from a legacy schema into
//! business-ready column descriptions for a migration target. Columns are
//! split into small chunks, each chunk is described to a language model
//! through an injected [`invoker::ModelInvoker`], and the structured answer
//! is validated and merged back onto the source records.
//!
//! # Guarantees
//! - One enhanced column per input column, in input order
//! - A chunk whose attempts are exhausted is enriched heuristically, never dropped
//! - Chunks are processed one at a time; no invocation runs concurrently
//! - Model output never reaches INFO logs; prompts are logged at TRACE only
//!
//! # Architecture
//! - `chunking` plans the batches
//! - `prompt` renders the comprehensive, simplified and basic prompts
//! - `enrichment` runs the retry ladder, merge and fallback
//! - `quality` computes the derived scores
//! - `reporting` summarizes enriched schemas

pub mod chunking;
pub mod enrichment;
pub mod error;
pub mod industry;
pub mod invoker;
pub mod logging;
pub mod models;
pub mod options;
pub mod prompt;
pub mod quality;
pub mod reporting;
pub mod validation;

// Re-export commonly used types
pub use enrichment::{
    ChunkOutcome, ChunkReport, EnrichmentConfig, EnrichmentRun, SchemaEnricher,
    heuristic_column_name,
};
pub use error::{EnrichmentError, Result};
pub use industry::{Industry, IndustryContextTable, IndustryProfile};
pub use invoker::{InvocationResult, ModelInvoker, parse_structured_response};
pub use logging::init_logging;
pub use models::{
    BusinessImportance, ColumnRecord, EnhancedColumn, MigrationComplexity, ProjectContext,
};
pub use options::{EnhancementOption, EnhancementOptions};
pub use prompt::{PromptBuilder, PromptStrategy};
pub use reporting::{NamingReport, ProjectSummary, TargetPlatform};
pub use validation::{ValidationError, initialize_response_validator, validate_response_shape};
