//! Model invocation seam.
//!
//! The enricher never talks to a language model directly. It hands a prompt to
//! a [`ModelInvoker`] and receives an [`InvocationResult`] describing whether
//! the call succeeded and whether the output parsed as JSON. Transports (HTTP
//! clients, local runtimes, replay files) live behind this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Outcome of a single model invocation.
///
/// `is_json` is only meaningful when `success` is true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub success: bool,
    #[serde(default)]
    pub is_json: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl InvocationResult {
    /// A transport or service-level failure.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// A successful call whose output parsed as JSON.
    pub fn json(parsed: Value) -> Self {
        Self {
            success: true,
            is_json: true,
            parsed_response: Some(parsed),
            ..Self::default()
        }
    }

    /// A successful call whose output could not be parsed.
    pub fn invalid_json(raw: impl Into<String>, json_error: impl Into<String>) -> Self {
        Self {
            success: true,
            is_json: false,
            json_error: Some(json_error.into()),
            response: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Failure reason suitable for logs.
    pub fn failure_reason(&self) -> String {
        if !self.success {
            self.error
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string())
        } else {
            self.json_error
                .clone()
                .unwrap_or_else(|| "Parse error".to_string())
        }
    }
}

/// A collaborator that turns a prompt into a structured result.
///
/// Implementations perform exactly one call per invocation and must not retry
/// internally; the enricher owns all retry decisions.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Sends a prompt and reports the outcome.
    async fn invoke(&self, prompt: &str) -> InvocationResult;

    /// Human-readable name of the backing model, for logs and reports.
    fn model_name(&self) -> &str;
}

/// Removes common wrappers around a JSON object in raw model output.
///
/// Triple quotes and markdown fences are stripped, and the text is cut to the
/// span between the first `{` and the last `}`.
///
/// # Example
/// ```rust
/// use schemalift_core::invoker::clean_json_response;
///
/// let raw = "Sure! ```json\n{\"enhanced_columns\": []}\n``` Hope that helps";
/// assert_eq!(clean_json_response(raw), "{\"enhanced_columns\": []}");
/// ```
pub fn clean_json_response(raw: &str) -> String {
    let mut text = raw.replace("\"\"\"", "").replace("'''", "");

    if let Some(start) = text.find("```json") {
        let after = &text[start.saturating_add("```json".len())..];
        let inner = after.split("```").next().unwrap_or(after);
        text = inner.to_string();
    } else if text.contains("```") {
        let mut parts = text.split("```");
        let _ = parts.next();
        if let Some(inner) = parts.next() {
            text = inner.to_string();
        }
    }

    let text = text.replace("```json", "").replace("```", "");
    let trimmed = text.trim();

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => trimmed[start..=end].to_string(),
        _ => trimmed.to_string(),
    }
}

/// Repairs and parses raw model output into an [`InvocationResult`].
///
/// Strict JSON is tried first. Text that only JSON5 accepts (trailing commas,
/// single quotes, comments) is still treated as JSON. The raw text is
/// preserved in `response` either way.
pub fn parse_structured_response(raw: &str) -> InvocationResult {
    let cleaned = clean_json_response(raw);
    let parsed = serde_json::from_str::<Value>(&cleaned).or_else(|strict| {
        json5::from_str::<Value>(&cleaned).map_err(|_| strict)
    });

    match parsed {
        Ok(parsed) => InvocationResult {
            response: Some(raw.to_string()),
            ..InvocationResult::json(parsed)
        },
        Err(e) => InvocationResult::invalid_json(raw, e.to_string()),
    }
}

/// Invoker that replays a fixed queue of results.
///
/// Every prompt it receives is recorded. Once the queue is exhausted each
/// further call reports a failure, which drives the enricher to its
/// heuristic fallback.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    responses: Mutex<VecDeque<InvocationResult>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInvoker {
    /// Creates an invoker that replays `responses` in order.
    pub fn new(responses: impl IntoIterator<Item = InvocationResult>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    /// Number of invocations received so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|prompts| prompts.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(&self, prompt: &str) -> InvocationResult {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| InvocationResult::failure("No scripted response remaining"))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
