//! Ollama-compatible model endpoint client.
//!
//! Implements [`ModelInvoker`] over the Ollama `/api/generate` endpoint. The
//! client never fails an invocation with an error: transport problems, HTTP
//! errors and unparseable output are all reported through
//! [`InvocationResult`] so the enrichment retry ladder can react to them.

use std::time::Duration;

use async_trait::async_trait;
use schemalift_core::{
    EnrichmentError, InvocationResult, ModelInvoker, Result, parse_structured_response,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default endpoint of a local Ollama server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
/// Default model name.
pub const DEFAULT_MODEL: &str = "gemma:latest";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Default cap on generated tokens per response.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

const CONNECTION_CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const TEMPERATURE: f32 = 0.1;
const TOP_P: f32 = 0.9;

/// Instructions appended to every prompt to keep the answer machine-readable.
pub const STRICT_JSON_SUFFIX: &str = "IMPORTANT:
- Respond ONLY with a valid JSON object.
- DO NOT include explanations, comments, markdown (```), or triple quotes.
- DO NOT OMIT any columns or use ellipsis (...) or phrases like \"omitted for brevity\".
- Include ALL requested fields for ALL columns.
- Use ONLY double quotes (\") for JSON keys and string values.
- The response must be directly parseable as JSON.";

/// Connection settings for an Ollama endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl OllamaConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Validates the endpoint URL, model name and timeout.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is not an http(s) URL with a
    /// host, the model name is blank or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            EnrichmentError::configuration(format!(
                "Invalid model endpoint URL '{}': {}",
                self.base_url, e
            ))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(EnrichmentError::configuration(format!(
                "Model endpoint must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(EnrichmentError::configuration(
                "Model endpoint URL has no host",
            ));
        }
        if self.model.trim().is_empty() {
            return Err(EnrichmentError::configuration("Model name cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(EnrichmentError::configuration(
                "Model timeout must be at least 1 second",
            ));
        }

        Ok(())
    }

    /// Joins an API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

/// Appends the strict JSON instructions to a prompt.
pub fn structured_prompt(prompt: &str) -> String {
    format!("{}\n\n{}\n", prompt, STRICT_JSON_SUFFIX)
}

/// HTTP client for an Ollama-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Creates a client after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid configuration or if the
    /// HTTP client cannot be built.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                EnrichmentError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Returns true if the server answers its model listing.
    pub async fn check_connection(&self) -> bool {
        match self
            .client
            .get(self.config.endpoint("api/tags"))
            .timeout(CONNECTION_CHECK_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Model endpoint unreachable: {}", e);
                false
            }
        }
    }

    /// Lists the models available on the server.
    ///
    /// # Errors
    ///
    /// Returns a model call failure if the server cannot be reached or
    /// answers with a non-success status.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.config.endpoint("api/tags"))
            .timeout(CONNECTION_CHECK_TIMEOUT)
            .send()
            .await
            .map_err(|e| EnrichmentError::model_call_failed(0, format!("Connection error: {}", e)))?;

        if !response.status().is_success() {
            return Err(EnrichmentError::model_call_failed(
                0,
                format!("Failed to list models: HTTP {}", response.status()),
            ));
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            EnrichmentError::model_call_failed(0, format!("Unreadable model list: {}", e))
        })?;

        Ok(tags.models.into_iter().map(|model| model.name).collect())
    }

    /// Whether the configured model is available on the server.
    pub async fn model_available(&self) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(models
            .iter()
            .any(|installed| model_matches(installed, &self.config.model)))
    }

    /// Sends a prompt as-is and returns the generated text.
    async fn generate(&self, prompt: &str) -> std::result::Result<String, String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                num_predict: self.config.max_tokens,
            },
        };

        let response = self
            .client
            .post(self.config.endpoint("api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "Request timed out. The model might be taking too long to respond.".to_string()
                } else {
                    format!("Connection error: {}", e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {}: {}", status.as_u16(), body.trim()));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| format!("Unreadable response body: {}", e))?;

        if let Some(tokens) = generated.eval_count {
            debug!("Model generated {} tokens", tokens);
        }

        Ok(generated.response)
    }
}

#[async_trait]
impl ModelInvoker for OllamaClient {
    async fn invoke(&self, prompt: &str) -> InvocationResult {
        match self.generate(&structured_prompt(prompt)).await {
            Ok(text) => parse_structured_response(&text),
            Err(reason) => {
                warn!("Model endpoint call failed: {}", reason);
                InvocationResult::failure(reason)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Compares model names the way Ollama resolves them: an untagged name
/// refers to its `latest` tag.
fn model_matches(installed: &str, requested: &str) -> bool {
    fn with_tag(name: &str) -> std::borrow::Cow<'_, str> {
        if name.contains(':') {
            name.into()
        } else {
            format!("{}:latest", name).into()
        }
    }

    with_tag(installed.trim()) == with_tag(requested.trim())
}
