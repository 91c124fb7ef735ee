//! LLM provider trait and request/response types.
//!
//! Defines the interface that all vision providers implement, plus the
//! factory that creates the right provider from CLI flags and config.

use super::client::AnalyzeOptions;
use crate::adapter::ImagePart;
use crate::config::Config;
use crate::error::AnalysisError;
use async_trait::async_trait;
use std::time::Duration;

/// A single image-plus-instruction request.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The image to analyze
    pub image: ImagePart,
    /// Text prompt for the model
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmRequest {
    /// Pair an image with a prompt under the client's generation settings.
    pub fn new(image: ImagePart, prompt: &str, options: &AnalyzeOptions) -> Self {
        Self {
            image,
            prompt: prompt.to_string(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        }
    }
}

/// The response from a provider call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text, exactly as the model returned it
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini", "ollama").
    fn name(&self) -> &str;

    /// Check whether the provider is configured and reachable.
    async fn is_available(&self) -> bool;

    /// Send the request and return the model's text.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AnalysisError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Environment variable named by a `${ENV_VAR}` reference, for error hints.
pub(crate) fn env_var_name(value: &str) -> Option<&str> {
    value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
}

/// Map a transport-level reqwest failure to an analysis error.
pub(crate) fn request_error(provider: &str, err: reqwest::Error, timeout: Duration) -> AnalysisError {
    if err.is_timeout() {
        AnalysisError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        AnalysisError::Llm {
            message: format!("{provider} request failed: {err}"),
            status_code: None,
        }
    }
}

/// Turn a non-2xx response into an error carrying the status and body.
pub(crate) async fn check_status(
    provider: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, AnalysisError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);
    Err(AnalysisError::Llm {
        message: format!("{provider} HTTP {status}: {detail}"),
        status_code: Some(status.as_u16()),
    })
}

/// Factory that creates the appropriate provider from CLI flags and config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Names accepted by [`LlmProviderFactory::create`].
    pub const PROVIDERS: &'static [&'static str] = &["gemini", "openai", "ollama"];

    /// Create an LLM provider based on provider name, config, and optional model override.
    ///
    /// A missing API key is not an error here. The provider is still built
    /// and reports the missing key when it is called.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("gemini", "openai", "ollama")
    /// * `config` - The full configuration (LLM section plus limits)
    /// * `model_override` - Optional model name that overrides the config default
    pub fn create(
        provider: &str,
        config: &Config,
        model_override: Option<&str>,
    ) -> Result<Box<dyn LlmProvider>, AnalysisError> {
        let timeout = Duration::from_millis(config.limits.llm_timeout_ms);
        match provider {
            "gemini" => {
                let cfg = config.llm.gemini();
                let model = model_override.map(String::from).unwrap_or(cfg.model.clone());
                Ok(Box::new(super::gemini::GeminiProvider::new(
                    &cfg.endpoint,
                    resolve_env_var(&cfg.api_key),
                    env_var_name(&cfg.api_key).unwrap_or("GOOGLE_API_KEY"),
                    &model,
                    timeout,
                )))
            }
            "openai" => {
                let cfg = config.llm.openai();
                let model = model_override.map(String::from).unwrap_or(cfg.model.clone());
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    &cfg.endpoint,
                    resolve_env_var(&cfg.api_key),
                    env_var_name(&cfg.api_key).unwrap_or("OPENAI_API_KEY"),
                    &model,
                    timeout,
                )))
            }
            "ollama" => {
                let cfg = config.llm.ollama();
                let model = model_override.map(String::from).unwrap_or(cfg.model.clone());
                Ok(Box::new(super::ollama::OllamaProvider::new(
                    &cfg.endpoint,
                    &model,
                    timeout,
                )))
            }
            other => Err(AnalysisError::UnknownProvider(other.to_string())),
        }
    }
}
