//! Dialoguer theme, title banner and result rendering for the session.

use calorie_core::{AnalysisOutcome, Banner, ImagePreview};
use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Returns a `ColorfulTheme` for the session prompts.
///
/// - Prompt prefix: green `?`
/// - Active item indicator: green `▸`
/// - Success prefix: green `✓`
/// - Error prefix: red `✗`
pub fn advisor_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().green(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("▸".to_string()).for_stderr().green(),
        active_item_style: Style::new().for_stderr().green(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Prints the title banner to stderr.
pub fn print_banner() {
    let title = format!("\u{1f37d}\u{fe0f}  Calorie Advisor v{}", calorie_core::VERSION);
    let tagline = "Upload a photo of your food to get calorie information!";

    let green = Style::new().for_stderr().green().bold();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    eprintln!("  {}", green.apply_to(title));
    eprintln!("  {}", dim.apply_to(tagline));
    eprintln!("  {}", dim.apply_to("─".repeat(tagline.chars().count())));
    eprintln!();
}

/// Print the decoded preview and its caption.
pub fn print_preview(preview: &ImagePreview, file_name: &str) {
    let dim = Style::new().for_stderr().dim();
    eprintln!();
    for line in &preview.lines {
        eprintln!("  {line}");
    }
    eprintln!("  {}", dim.apply_to(format!("Your food image: {}", preview.caption(file_name))));
    eprintln!();
}

/// Print a yellow warning line.
pub fn print_warning(message: &str) {
    let warn = Style::new().for_stderr().yellow();
    eprintln!("  {}", warn.apply_to(message));
}

/// Print the banner on stderr and the result text on stdout.
///
/// The text is written exactly as returned; only the banner is styled.
pub fn print_outcome(outcome: &AnalysisOutcome) {
    let banner = outcome.banner();
    let styled = match banner {
        Banner::Success => Style::new().for_stderr().green().bold(),
        Banner::Failure => Style::new().for_stderr().red().bold(),
    };
    let prefix = match banner {
        Banner::Success => "✓",
        Banner::Failure => "✗",
    };

    eprintln!();
    eprintln!("  {}", styled.apply_to(format!("{prefix} {}", banner.message())));
    eprintln!();
    println!("{}", outcome.render());
    eprintln!();
}
