//! Calorie Advisor CLI - upload a food photo, get a calorie breakdown.
//!
//! Run without a subcommand for the interactive session: pick an image,
//! check the preview, and ask the model for a breakdown as many times as you
//! like.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session
//! calorie
//!
//! # One-shot analysis
//! calorie analyze lunch.jpg
//! calorie analyze lunch.png --format json --output lunch.json
//!
//! # View configuration, check the API key
//! calorie config show
//! calorie config check
//! ```

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod cli;
mod logging;

/// Calorie Advisor - upload a food photo, get a calorie breakdown.
#[derive(Parser, Debug)]
#[command(name = "calorie")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Vision model provider (defaults to `llm.provider` from config)
    #[arg(long, global = true, value_enum)]
    provider: Option<cli::ProviderArg>,

    /// Model name override (provider-specific)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a single food photo and print the result
    Analyze(cli::analyze::AnalyzeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // GOOGLE_API_KEY and friends may live in a .env file next to the user
    dotenv::dotenv().ok();

    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match calorie_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `calorie config path`."
            );
            calorie_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Calorie Advisor v{}", calorie_core::VERSION);

    let choice = cli::ProviderChoice {
        provider: cli.provider,
        model: cli.model,
    };

    match cli.command {
        Some(Commands::Analyze(args)) => cli::analyze::execute(args, &config, &choice).await,
        Some(Commands::Config(args)) => {
            cli::config::execute(args, &config, &choice).await?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            cli::interactive::run(&config, &choice).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
