//! Retry ladder state machine.
//!
//! Each chunk starts `Pending`. Every attempt ends in one of four states and
//! [`transition`] decides what happens next. A chunk can only leave the
//! ladder through `Done` (model output merged) or `Fallback` (heuristic
//! enrichment), so no chunk is ever dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EnrichmentError;
use crate::invoker::InvocationResult;
use crate::validation::validate_response_shape;
use crate::{Result, prompt::PromptStrategy};

/// State of a chunk after its most recent attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    /// No attempt made yet
    Pending,
    /// The collaborator reported `success = false`
    ModelCallFailed,
    /// The collaborator reported unparseable output
    JsonInvalid,
    /// The response held a different number of columns than requested
    CountMismatch,
    /// The response was merged
    Succeeded,
}

impl AttemptState {
    /// True for states that end an attempt without usable output.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            AttemptState::ModelCallFailed | AttemptState::JsonInvalid | AttemptState::CountMismatch
        )
    }
}

/// Next step of the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Make another attempt with this 1-based attempt number
    Retry { next_attempt: usize },
    /// Give up on the model and use heuristic enrichment
    Fallback,
    /// The chunk is enriched
    Done,
}

/// How a chunk was finally enriched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkOutcome {
    Enhanced,
    FellBack,
}

/// Transition table of the retry ladder.
///
/// `attempts_made` is the number of attempts already made for the chunk.
///
/// | state            | attempts_made < max_retries | otherwise  |
/// |------------------|-----------------------------|------------|
/// | Pending          | Retry(1)                    | Fallback   |
/// | any failure      | Retry(attempts_made + 1)    | Fallback   |
/// | Succeeded        | Done                        | Done       |
pub fn transition(state: AttemptState, attempts_made: usize, max_retries: usize) -> Transition {
    match state {
        AttemptState::Succeeded => Transition::Done,
        AttemptState::Pending
        | AttemptState::ModelCallFailed
        | AttemptState::JsonInvalid
        | AttemptState::CountMismatch => {
            if attempts_made < max_retries {
                Transition::Retry {
                    next_attempt: attempts_made.saturating_add(1),
                }
            } else {
                Transition::Fallback
            }
        }
    }
}

/// A failed attempt, kept for the chunk report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptFailure {
    /// 1-based attempt number
    pub attempt: usize,
    pub strategy: PromptStrategy,
    pub state: AttemptState,
    pub reason: String,
}

/// Assessment of one invocation result.
#[derive(Debug)]
pub enum AttemptAssessment<'r> {
    /// Order-aligned entries ready to merge
    Accepted(&'r [Value]),
    /// A retryable failure
    Rejected {
        state: AttemptState,
        error: EnrichmentError,
    },
}

/// Classifies an invocation result for a chunk of `expected` columns.
///
/// Checks run in order: call success, JSON validity, response shape, column
/// count.
///
/// # Errors
/// Returns [`EnrichmentError::SchemaShape`] when the parsed response is not
/// an object with an `enhanced_columns` array of objects. Shape errors are
/// never retried.
pub fn assess_attempt(
    result: &InvocationResult,
    chunk_index: usize,
    expected: usize,
) -> Result<AttemptAssessment<'_>> {
    if !result.success {
        return Ok(AttemptAssessment::Rejected {
            state: AttemptState::ModelCallFailed,
            error: EnrichmentError::model_call_failed(chunk_index, result.failure_reason()),
        });
    }

    let parsed = match (&result.parsed_response, result.is_json) {
        (Some(parsed), true) => parsed,
        (None, true) => {
            return Ok(AttemptAssessment::Rejected {
                state: AttemptState::JsonInvalid,
                error: EnrichmentError::malformed_json(chunk_index, "No parsed response returned"),
            });
        }
        (_, false) => {
            return Ok(AttemptAssessment::Rejected {
                state: AttemptState::JsonInvalid,
                error: EnrichmentError::malformed_json(chunk_index, result.failure_reason()),
            });
        }
    };

    let entries = validate_response_shape(parsed)
        .map_err(|e| EnrichmentError::schema_shape(chunk_index, e.to_string()))?;

    if entries.len() != expected {
        return Ok(AttemptAssessment::Rejected {
            state: AttemptState::CountMismatch,
            error: EnrichmentError::count_mismatch(chunk_index, expected, entries.len()),
        });
    }

    Ok(AttemptAssessment::Accepted(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pending_starts_first_attempt() {
        assert_eq!(
            transition(AttemptState::Pending, 0, 3),
            Transition::Retry { next_attempt: 1 }
        );
    }

    #[test]
    fn test_failures_retry_until_budget_is_spent() {
        for state in [
            AttemptState::ModelCallFailed,
            AttemptState::JsonInvalid,
            AttemptState::CountMismatch,
        ] {
            assert_eq!(transition(state, 1, 3), Transition::Retry { next_attempt: 2 });
            assert_eq!(transition(state, 2, 3), Transition::Retry { next_attempt: 3 });
            assert_eq!(transition(state, 3, 3), Transition::Fallback);
        }
    }

    #[test]
    fn test_success_is_terminal() {
        assert_eq!(transition(AttemptState::Succeeded, 1, 3), Transition::Done);
        assert_eq!(transition(AttemptState::Succeeded, 3, 3), Transition::Done);
    }

    #[test]
    fn test_zero_budget_falls_back_immediately() {
        assert_eq!(transition(AttemptState::Pending, 0, 0), Transition::Fallback);
    }

    #[test]
    fn test_failure_states() {
        assert!(AttemptState::ModelCallFailed.is_failure());
        assert!(AttemptState::JsonInvalid.is_failure());
        assert!(AttemptState::CountMismatch.is_failure());
        assert!(!AttemptState::Pending.is_failure());
        assert!(!AttemptState::Succeeded.is_failure());
    }

    #[test]
    fn test_assess_model_call_failure() {
        let result = InvocationResult::failure("connection refused");
        match assess_attempt(&result, 2, 6).unwrap() {
            AttemptAssessment::Rejected { state, error } => {
                assert_eq!(state, AttemptState::ModelCallFailed);
                assert_eq!(error.chunk_index(), Some(2));
                assert!(error.to_string().contains("connection refused"));
            }
            AttemptAssessment::Accepted(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_assess_invalid_json() {
        let result = InvocationResult::invalid_json("oops", "expected value at line 1");
        let assessment = assess_attempt(&result, 1, 1).unwrap();
        assert!(matches!(
            assessment,
            AttemptAssessment::Rejected {
                state: AttemptState::JsonInvalid,
                ..
            }
        ));

        let result = InvocationResult {
            success: true,
            is_json: true,
            ..InvocationResult::default()
        };
        let assessment = assess_attempt(&result, 1, 1).unwrap();
        assert!(matches!(
            assessment,
            AttemptAssessment::Rejected {
                state: AttemptState::JsonInvalid,
                ..
            }
        ));
    }

    #[test]
    fn test_assess_count_mismatch() {
        let entries: Vec<Value> = (0..5).map(|i| json!({"original_name": i})).collect();
        let result = InvocationResult::json(json!({"enhanced_columns": entries}));

        match assess_attempt(&result, 1, 6).unwrap() {
            AttemptAssessment::Rejected { state, error } => {
                assert_eq!(state, AttemptState::CountMismatch);
                assert!(matches!(
                    error,
                    EnrichmentError::CountMismatch {
                        expected: 6,
                        actual: 5,
                        ..
                    }
                ));
            }
            AttemptAssessment::Accepted(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_assess_shape_error_is_raised() {
        let result = InvocationResult::json(json!({"columns": []}));
        let err = assess_attempt(&result, 3, 2).unwrap_err();
        assert!(matches!(err, EnrichmentError::SchemaShape { chunk_index: 3, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_assess_accepts_matching_response() {
        let result = InvocationResult::json(json!({
            "enhanced_columns": [{"suggested_name": "a"}, {"suggested_name": "b"}]
        }));
        match assess_attempt(&result, 1, 2).unwrap() {
            AttemptAssessment::Accepted(entries) => assert_eq!(entries.len(), 2),
            AttemptAssessment::Rejected { error, .. } => panic!("unexpected rejection: {error}"),
        }
    }
}
