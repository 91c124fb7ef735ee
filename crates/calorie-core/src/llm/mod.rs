//! Vision model integration.
//!
//! Provides a provider abstraction over several backends (Gemini, OpenAI,
//! Ollama) and the fail-soft [`AnalysisClient`] that the session drives.

pub(crate) mod client;
pub(crate) mod gemini;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;

pub use client::{AnalysisClient, AnalysisOutcome, AnalyzeOptions, Banner, ERROR_PREFIX};
pub use provider::{resolve_env_var, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse};
