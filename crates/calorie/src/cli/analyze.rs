//! The `calorie analyze` command: one photo, one call, print the result.

use calorie_core::{AnalysisRecord, Config, ImagePreview, Session, UploadedImage};
use clap::{Args, ValueEnum};
use console::Style;
use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use super::ProviderChoice;

/// Output formats for one-shot analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// The model's text as-is (or "Error: ...")
    #[default]
    Text,
    /// A JSON record with status, text and model details
    Json,
}

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Food photo to analyze (jpg, jpeg or png)
    #[arg(required = true)]
    pub image: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the analyze command.
///
/// Exits non-zero when the analysis failed, after writing the error string
/// like any other result.
pub async fn execute(
    args: AnalyzeArgs,
    config: &Config,
    choice: &ProviderChoice,
) -> anyhow::Result<ExitCode> {
    let image = UploadedImage::load(&args.image, &config.upload, &config.limits)?;
    let preview = ImagePreview::decode(&image, &config.limits, 0).await?;
    tracing::info!("{}", preview.caption(image.file_name()));

    let client = super::build_client(config, choice)?;
    let mut session = Session::new();
    session.select_file(image, preview);

    let spinner = std::io::stderr()
        .is_terminal()
        .then(super::analyzing_spinner);
    let outcome = session.analyze(&client).await?.clone();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    match args.format {
        OutputFormat::Text => {
            writeln!(writer, "{}", outcome.render())?;
            writer.flush()?;
        }
        OutputFormat::Json => {
            let image = session
                .image()
                .ok_or_else(|| anyhow::anyhow!("session lost its image"))?;
            AnalysisRecord::new(image, client.provider_name(), &outcome)
                .write_json(&mut writer, args.pretty)?;
        }
    }

    if let Some(path) = &args.output {
        let style = if outcome.is_success() {
            Style::new().for_stderr().green()
        } else {
            Style::new().for_stderr().red()
        };
        eprintln!(
            "{} written to {}",
            style.apply_to(outcome.banner().message()),
            path.display()
        );
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
