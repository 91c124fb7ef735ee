//! Interactive mode: the session a bare `calorie` invocation opens.
//!
//! The terminal stands in for the upload page: a path prompt is the upload
//! control, a color preview shows the image, a menu holds the trigger, and a
//! spinner runs while the model works.

pub mod flow;
pub mod theme;

use calorie_core::Config;
use console::Style;
use dialoguer::Select;

use super::ProviderChoice;

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
///
/// Use this to wrap `interact_text()` / `interact()` calls that lack an `_opt`
/// variant, so interrupts exit the current flow cleanly instead of panicking.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Main menu options presented to the user.
const MENU_ITEMS: &[&str] = &["Analyze a food photo", "Show settings", "Exit"];

/// Entry point for interactive mode.
pub async fn run(config: &Config, choice: &ProviderChoice) -> anyhow::Result<()> {
    theme::print_banner();

    let theme = theme::advisor_theme();
    let client = super::build_client(config, choice)?;

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => flow::run_session(config, &client).await?,
            Some(1) => show_settings(config, choice),
            Some(2) | None => break, // Exit or Ctrl+C / Esc
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// Summary of the settings that matter for an analysis.
fn show_settings(config: &Config, choice: &ProviderChoice) {
    let dim = Style::new().for_stderr().dim();
    let cyan = Style::new().for_stderr().cyan();
    let label = Style::new().for_stderr().bold();

    let config_path = Config::default_path();
    let path_note = if config_path.exists() {
        "(exists)"
    } else {
        "(using defaults)"
    };

    let provider = choice.provider_name(config);
    let model = choice.model.clone().unwrap_or_else(|| model_for(config, &provider));

    eprintln!();
    eprintln!("  {}", cyan.apply_to("Current settings:"));
    eprintln!();
    eprintln!(
        "    {:<16} {} {}",
        label.apply_to("Config file:"),
        config_path.display(),
        dim.apply_to(path_note)
    );
    eprintln!("    {:<16} {provider}", label.apply_to("Provider:"));
    eprintln!("    {:<16} {model}", label.apply_to("Model:"));
    eprintln!(
        "    {:<16} {}",
        label.apply_to("Accepted files:"),
        config.upload.accepted_list()
    );
    eprintln!(
        "    {:<16} {} MB",
        label.apply_to("Max upload:"),
        config.limits.max_file_size_mb
    );
    eprintln!(
        "    {:<16} {} s",
        label.apply_to("Request timeout:"),
        config.limits.llm_timeout_ms / 1000
    );
    eprintln!();
}

/// Configured model name for a provider.
fn model_for(config: &Config, provider: &str) -> String {
    match provider {
        "gemini" => config.llm.gemini().model,
        "openai" => config.llm.openai().model,
        "ollama" => config.llm.ollama().model,
        other => format!("(unknown provider {other})"),
    }
}
