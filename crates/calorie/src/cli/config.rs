//! `calorie config`: inspect, create and check the configuration file.

use calorie_core::Config;
use clap::{Args, Subcommand};
use console::Style;

use super::ProviderChoice;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print where the config file is read from
    Path,

    /// Write a config file with every provider section filled in
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check that the selected provider can be reached with the current key
    Check,
}

pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    choice: &ProviderChoice,
) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => println!("{}", config.to_toml()?),
        ConfigCommand::Path => println!("{}", Config::default_path().display()),
        ConfigCommand::Init { force } => init(force)?,
        ConfigCommand::Check => check(config, choice).await?,
    }
    Ok(())
}

fn init(force: bool) -> anyhow::Result<()> {
    let path = Config::default_path();
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_toml()?)?;

    tracing::info!(path = %path.display(), "Config file written");
    println!("Configuration initialized at: {}", path.display());
    Ok(())
}

/// A missing key only shows up when an analysis runs; this surfaces it
/// up front.
async fn check(config: &Config, choice: &ProviderChoice) -> anyhow::Result<()> {
    let client = super::build_client(config, choice)?;
    let provider = client.provider_name().to_string();
    let ready = client.is_available().await;

    let (style, verdict) = if ready {
        (Style::new().green(), "ready")
    } else {
        (Style::new().red(), "not ready")
    };
    println!("{provider}: {}", style.apply_to(verdict));
    if !ready {
        println!("  {}", unavailable_hint(&provider));
        anyhow::bail!("provider {provider} is not ready");
    }
    Ok(())
}

fn unavailable_hint(provider: &str) -> &'static str {
    match provider {
        "gemini" => "Set GOOGLE_API_KEY (environment or .env) or llm.gemini.api_key.",
        "openai" => "Set OPENAI_API_KEY (environment or .env) or llm.openai.api_key.",
        "ollama" => "Start Ollama (`ollama serve`) or point llm.ollama.endpoint at it.",
        _ => "Check the [llm] section of the config file.",
    }
}

/// Defaults with every provider section spelled out, so the written file
/// shows where keys and models go.
fn default_config_toml() -> anyhow::Result<String> {
    let mut config = Config::default();
    config.llm.gemini = Some(Default::default());
    config.llm.openai = Some(Default::default());
    config.llm.ollama = Some(Default::default());
    Ok(config.to_toml()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_toml_lists_all_providers() {
        let toml = default_config_toml().unwrap();
        assert!(toml.contains("[llm.gemini]"));
        assert!(toml.contains("[llm.openai]"));
        assert!(toml.contains("[llm.ollama]"));
        assert!(toml.contains("${GOOGLE_API_KEY}"));
    }

    #[test]
    fn default_config_toml_parses_back() {
        let parsed: Config = toml::from_str(&default_config_toml().unwrap()).unwrap();
        assert_eq!(parsed.llm.gemini().model, "gemini-1.5-pro");
    }

    #[test]
    fn hint_names_the_key_variable() {
        assert!(unavailable_hint("gemini").contains("GOOGLE_API_KEY"));
        assert!(unavailable_hint("ollama").contains("ollama serve"));
    }

    #[tokio::test]
    async fn check_fails_when_gemini_key_is_missing() {
        let mut config = Config::default();
        let mut gemini = config.llm.gemini();
        gemini.api_key = "${CALORIE_TEST_UNSET_KEY}".to_string();
        config.llm.gemini = Some(gemini);

        let err = check(&config, &ProviderChoice::default()).await.unwrap_err();
        assert!(err.to_string().contains("gemini"));
    }
}
