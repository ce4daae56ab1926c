//! Enrichment configuration.
//!
//! Controls chunk sizing, the retry budget per chunk, prompt sample limits
//! and score clamping.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunking::DEFAULT_CHUNK_SIZE;
use crate::prompt::DEFAULT_MAX_SAMPLE_VALUES;

/// Default number of attempts per chunk before falling back.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Upper bound on attempts per chunk.
pub const MAX_RETRIES_LIMIT: usize = 10;

/// Enrichment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Columns per model invocation (at least 1)
    pub chunk_size: usize,
    /// Attempts per chunk, including the first (1..=10)
    pub max_retries: usize,
    /// Sample values embedded per column in the comprehensive prompt
    pub max_sample_values: usize,
    /// Clamp the data quality score to [0.0, 1.0]
    pub clamp_quality_score: bool,
}

/// Validation errors for enrichment configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("chunk_size must be at least 1, got {0}")]
    InvalidChunkSize(usize),
    #[error("max_retries must be between 1 and {MAX_RETRIES_LIMIT}, got {0}")]
    InvalidMaxRetries(usize),
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            max_sample_values: DEFAULT_MAX_SAMPLE_VALUES,
            clamp_quality_score: true,
        }
    }
}

impl EnrichmentConfig {
    /// Creates a new enrichment config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        if chunk_size == 0 {
            tracing::warn!("chunk_size 0 clamped to 1");
        }
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Builder method to set the number of attempts per chunk.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        if !(1..=MAX_RETRIES_LIMIT).contains(&max_retries) {
            tracing::warn!(
                "max_retries {} clamped to valid range [1, {}]",
                max_retries,
                MAX_RETRIES_LIMIT
            );
        }
        self.max_retries = max_retries.clamp(1, MAX_RETRIES_LIMIT);
        self
    }

    /// Builder method to set the sample limit of the comprehensive prompt.
    pub fn with_max_sample_values(mut self, max_sample_values: usize) -> Self {
        self.max_sample_values = max_sample_values;
        self
    }

    /// Builder method to enable or disable quality score clamping.
    pub fn with_clamp_quality_score(mut self, clamp: bool) -> Self {
        self.clamp_quality_score = clamp;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error if any value is outside its valid range.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.chunk_size == 0 {
            return Err(ConfigValidationError::InvalidChunkSize(self.chunk_size));
        }
        if !(1..=MAX_RETRIES_LIMIT).contains(&self.max_retries) {
            return Err(ConfigValidationError::InvalidMaxRetries(self.max_retries));
        }
        Ok(())
    }
}
