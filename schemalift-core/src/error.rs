//! Error types for schema enrichment.
//!
//! Chunk-level failures carry the 1-based chunk index so that a caller can
//! tell which batch of columns was affected. Model output is never echoed in
//! full inside an error message; reasons are truncated to keep logs readable.

use thiserror::Error;

/// Maximum number of characters of a collaborator-supplied reason kept in an error.
const MAX_REASON_CHARS: usize = 240;

/// Main error type for SchemaLift operations.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The model-invocation collaborator reported a transport or service failure
    #[error("Model call failed for chunk {chunk_index}: {reason}")]
    ModelCallFailure { chunk_index: usize, reason: String },

    /// The collaborator returned output that is not parseable JSON
    #[error("Model returned invalid JSON for chunk {chunk_index}: {reason}")]
    MalformedJson { chunk_index: usize, reason: String },

    /// The number of returned columns differs from the number requested
    #[error("Chunk {chunk_index}: expected {expected} columns, but model returned {actual}")]
    CountMismatch {
        chunk_index: usize,
        expected: usize,
        actual: usize,
    },

    /// The response is structurally incompatible (missing `enhanced_columns` array)
    #[error("Model response for chunk {chunk_index} has an unexpected shape: {reason}")]
    SchemaShape { chunk_index: usize, reason: String },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with EnrichmentError
pub type Result<T> = std::result::Result<T, EnrichmentError>;

/// Shortens a collaborator-supplied message so that raw model output
/// cannot flood error messages or logs.
///
/// # Example
///
/// ```rust
/// use schemalift_core::error::truncate_reason;
///
/// let long = "x".repeat(1000);
/// assert!(truncate_reason(&long).chars().count() < 1000);
/// assert_eq!(truncate_reason("short"), "short");
/// ```
pub fn truncate_reason(reason: &str) -> String {
    let trimmed = reason.trim();
    if trimmed.chars().count() <= MAX_REASON_CHARS {
        return trimmed.to_string();
    }
    let mut shortened: String = trimmed.chars().take(MAX_REASON_CHARS).collect();
    shortened.push_str("...");
    shortened
}

impl EnrichmentError {
    /// Creates a model call failure for a chunk
    pub fn model_call_failed(chunk_index: usize, reason: impl AsRef<str>) -> Self {
        Self::ModelCallFailure {
            chunk_index,
            reason: truncate_reason(reason.as_ref()),
        }
    }

    /// Creates a malformed JSON error for a chunk
    pub fn malformed_json(chunk_index: usize, reason: impl AsRef<str>) -> Self {
        Self::MalformedJson {
            chunk_index,
            reason: truncate_reason(reason.as_ref()),
        }
    }

    /// Creates a count mismatch error for a chunk
    pub fn count_mismatch(chunk_index: usize, expected: usize, actual: usize) -> Self {
        Self::CountMismatch {
            chunk_index,
            expected,
            actual,
        }
    }

    /// Creates a response shape error for a chunk
    pub fn schema_shape(chunk_index: usize, reason: impl AsRef<str>) -> Self {
        Self::SchemaShape {
            chunk_index,
            reason: truncate_reason(reason.as_ref()),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Returns the chunk index for chunk-level errors.
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            Self::ModelCallFailure { chunk_index, .. }
            | Self::MalformedJson { chunk_index, .. }
            | Self::CountMismatch { chunk_index, .. }
            | Self::SchemaShape { chunk_index, .. } => Some(*chunk_index),
            _ => None,
        }
    }

    /// Whether the retry ladder may recover from this error.
    ///
    /// Shape errors indicate a structurally incompatible response and are
    /// surfaced immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ModelCallFailure { .. } | Self::MalformedJson { .. } | Self::CountMismatch { .. }
        )
    }
}
