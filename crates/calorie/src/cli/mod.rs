//! Command implementations and the pieces they share.

pub mod analyze;
pub mod config;
pub mod interactive;

use calorie_core::{AnalysisClient, AnalyzeOptions, Config, LlmProviderFactory};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Supported vision model providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Google Gemini API
    Gemini,
    /// OpenAI (or a compatible endpoint)
    Openai,
    /// Local Ollama instance
    Ollama,
}

impl std::fmt::Display for ProviderArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderArg::Gemini => write!(f, "gemini"),
            ProviderArg::Openai => write!(f, "openai"),
            ProviderArg::Ollama => write!(f, "ollama"),
        }
    }
}

/// Provider and model picked on the command line.
#[derive(Debug, Clone, Default)]
pub struct ProviderChoice {
    pub provider: Option<ProviderArg>,
    pub model: Option<String>,
}

impl ProviderChoice {
    /// Provider name: the flag if given, else the config default.
    pub fn provider_name(&self, config: &Config) -> String {
        match self.provider {
            Some(p) => p.to_string(),
            None => config.llm.provider.clone(),
        }
    }
}

/// Build the analysis client for this run.
pub fn build_client(config: &Config, choice: &ProviderChoice) -> anyhow::Result<AnalysisClient> {
    let name = choice.provider_name(config);
    let provider = LlmProviderFactory::create(&name, config, choice.model.as_deref())?;
    tracing::debug!(provider = %name, "Analysis client ready");
    Ok(AnalysisClient::new(provider, AnalyzeOptions::from_config(config)))
}

/// Busy indicator shown while a request is in flight.
pub fn analyzing_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("  {spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Analyzing your food...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
