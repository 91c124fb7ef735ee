//! The analysis client: one provider call per analysis, failures folded into
//! the outcome.
//!
//! Callers get an [`AnalysisOutcome`] to branch on. The string contract is
//! kept by [`AnalysisOutcome::render`]: model text verbatim on success,
//! `"Error: <message>"` on failure.

use super::provider::{LlmProvider, LlmRequest, LlmResponse};
use crate::adapter::ImagePart;
use crate::config::Config;
use std::sync::Arc;

/// Prefix of a rendered failure.
pub const ERROR_PREFIX: &str = "Error: ";

/// Generation settings applied to every request.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.4,
        }
    }
}

impl AnalyzeOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
        }
    }
}

/// Result of one analysis.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Success(LlmResponse),
    Failure { message: String },
}

/// Which banner accompanies a displayed outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Success,
    Failure,
}

impl Banner {
    pub fn message(self) -> &'static str {
        match self {
            Banner::Success => "Analysis Complete!",
            Banner::Failure => "Analysis Failed",
        }
    }
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }

    /// Fail-soft string form: the text verbatim, or `"Error: <message>"`.
    pub fn render(&self) -> String {
        match self {
            AnalysisOutcome::Success(response) => response.text.clone(),
            AnalysisOutcome::Failure { message } => format!("{ERROR_PREFIX}{message}"),
        }
    }

    pub fn banner(&self) -> Banner {
        if self.is_success() {
            Banner::Success
        } else {
            Banner::Failure
        }
    }
}

/// Sends an adapted image plus prompt to a vision provider.
pub struct AnalysisClient {
    provider: Arc<dyn LlmProvider>,
    options: AnalyzeOptions,
}

impl AnalysisClient {
    pub fn new(provider: Box<dyn LlmProvider>, options: AnalyzeOptions) -> Self {
        Self {
            provider: Arc::from(provider),
            options,
        }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Whether the provider has what it needs to take a call (key set,
    /// server reachable).
    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    /// Run one analysis. Never returns an error and never panics: every
    /// failure, including a panicking provider, becomes
    /// [`AnalysisOutcome::Failure`].
    ///
    /// `parts` must hold the adapted image; an empty list fails without a
    /// remote call.
    pub async fn analyze(&self, parts: &[ImagePart], prompt: &str) -> AnalysisOutcome {
        let Some(image) = parts.first() else {
            tracing::warn!("Analysis requested without an image");
            return AnalysisOutcome::Failure {
                message: "no image supplied".to_string(),
            };
        };

        let request = LlmRequest::new(image.clone(), prompt, &self.options);

        tracing::debug!(
            provider = self.provider.name(),
            media_type = %request.image.mime_type,
            bytes = request.image.data.len(),
            "Starting analysis"
        );

        let provider = self.provider.clone();
        let handle = tokio::spawn(async move { provider.generate(&request).await });

        match handle.await {
            Ok(Ok(response)) => {
                tracing::info!(
                    model = %response.model,
                    latency_ms = response.latency_ms,
                    tokens = ?response.tokens_used,
                    "Analysis complete"
                );
                AnalysisOutcome::Success(response)
            }
            Ok(Err(e)) => {
                tracing::error!(provider = self.provider.name(), "Analysis failed: {e}");
                AnalysisOutcome::Failure {
                    message: e.to_string(),
                }
            }
            Err(e) => {
                tracing::error!(provider = self.provider.name(), "Analysis task panicked: {e}");
                AnalysisOutcome::Failure {
                    message: format!("analysis task failed: {e}"),
                }
            }
        }
    }

    /// String form of [`AnalysisClient::analyze`].
    pub async fn analyze_text(&self, parts: &[ImagePart], prompt: &str) -> String {
        self.analyze(parts, prompt).await.render()
    }
}
