//! Guided analysis flow.
//!
//! Upload → preview → "Calculate Calories" → spinner → result, repeated until
//! the user goes back. All state lives in a [`Session`]; this module only
//! turns prompts into session calls and session state into output.

use calorie_core::{AnalysisClient, Config, ImagePreview, Session, SessionState, UploadedImage};
use dialoguer::{Input, Select};

use super::theme::{advisor_theme, print_outcome, print_preview, print_warning};

/// What the user can do from the session menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Upload,
    Calculate,
    Back,
}

/// Menu entries for the current state. The trigger is always offered so a
/// press without an upload gets the warning instead of a hidden option.
fn menu_for(state: &SessionState) -> Vec<(Action, &'static str)> {
    let upload_label = match state {
        SessionState::Idle => "Upload your food image",
        _ => "Upload a different image",
    };
    let calculate_label = match state {
        SessionState::Resolved { .. } => "Calculate Calories again",
        _ => "Calculate Calories",
    };
    let mut items = vec![
        (Action::Upload, upload_label),
        (Action::Calculate, calculate_label),
        (Action::Back, "Back to main menu"),
    ];
    if !matches!(state, SessionState::Idle) {
        // With an image loaded, the trigger is the natural next step
        items.swap(0, 1);
    }
    items
}

/// Run one session until the user goes back to the main menu.
pub async fn run_session(config: &Config, client: &AnalysisClient) -> anyhow::Result<()> {
    let theme = advisor_theme();
    let mut session = Session::new();

    loop {
        let items = menu_for(session.state());
        let labels: Vec<&str> = items.iter().map(|(_, label)| *label).collect();

        let selection = Select::with_theme(&theme)
            .with_prompt("Calorie Advisor")
            .items(&labels)
            .default(0)
            .interact_opt()?;

        let Some(action) = selection.and_then(|i| items.get(i)).map(|(a, _)| *a) else {
            return Ok(()); // Esc
        };

        match action {
            Action::Upload => {
                if let Some((image, preview)) = prompt_upload(config, &theme).await? {
                    print_preview(&preview, image.file_name());
                    session.select_file(image, preview);
                }
            }
            Action::Calculate => calculate(&mut session, client).await,
            Action::Back => return Ok(()),
        }
    }
}

/// Ask for a file and build its preview. Bad files are reported and leave
/// the session as it was.
async fn prompt_upload(
    config: &Config,
    theme: &dialoguer::theme::ColorfulTheme,
) -> anyhow::Result<Option<(UploadedImage, ImagePreview)>> {
    let Some(raw_path) = super::handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt(format!(
                "Upload your food image ({})",
                config.upload.accepted_list()
            ))
            .interact_text(),
    )?
    else {
        return Ok(None);
    };

    let path = Config::expand_path(&raw_path);
    let image = match UploadedImage::load(&path, &config.upload, &config.limits) {
        Ok(image) => image,
        Err(e) => {
            print_warning(&e.to_string());
            return Ok(None);
        }
    };

    let columns = if config.preview.enabled {
        config.preview.width
    } else {
        0
    };
    match ImagePreview::decode(&image, &config.limits, columns).await {
        Ok(preview) => Ok(Some((image, preview))),
        Err(e) => {
            print_warning(&format!("Could not open {}: {e}", image.file_name()));
            Ok(None)
        }
    }
}

/// Press the trigger: run the session's analysis under a spinner, then show
/// the result or the reason it was refused.
async fn calculate(session: &mut Session, client: &AnalysisClient) {
    let spinner = crate::cli::analyzing_spinner();
    let result = session.analyze(client).await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => print_outcome(outcome),
        Err(rejected) => print_warning(&rejected.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use calorie_core::llm::{LlmRequest, LlmResponse};
    use calorie_core::{AnalysisError, AnalysisOutcome, AnalyzeOptions, LlmProvider};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Answers every call with the same text and counts calls.
    struct CannedProvider {
        text: &'static str,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn generate(&self, _request: &LlmRequest) -> Result<LlmResponse, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LlmResponse {
                text: self.text.to_string(),
                model: "canned-1".to_string(),
                tokens_used: None,
                latency_ms: 1,
            })
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(1)
        }
    }

    fn canned_client(text: &'static str) -> (AnalysisClient, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let provider = CannedProvider {
            text,
            calls: calls.clone(),
        };
        (
            AnalysisClient::new(Box::new(provider), AnalyzeOptions::default()),
            calls,
        )
    }

    fn previewing() -> SessionState {
        SessionState::Previewing {
            image: UploadedImage::from_bytes(vec![1], "image/png", "a.png"),
            preview: ImagePreview {
                width: 1,
                height: 1,
                format: "png".to_string(),
                file_size: 1,
                lines: vec![],
            },
        }
    }

    #[test]
    fn idle_menu_offers_upload_first_but_keeps_trigger() {
        let items = menu_for(&SessionState::Idle);
        assert_eq!(items[0].0, Action::Upload);
        assert!(items.iter().any(|(a, _)| *a == Action::Calculate));
    }

    #[test]
    fn previewing_menu_offers_trigger_first() {
        let items = menu_for(&previewing());
        assert_eq!(items[0], (Action::Calculate, "Calculate Calories"));
        assert_eq!(items[1], (Action::Upload, "Upload a different image"));
    }

    #[tokio::test]
    async fn calculate_without_upload_stays_idle_and_skips_call() {
        let (client, calls) = canned_client("unused");
        let mut session = Session::new();

        calculate(&mut session, &client).await;

        assert!(matches!(session.state(), SessionState::Idle));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn calculate_resolves_with_model_text() {
        let (client, calls) = canned_client("TOTAL CALORIES: 95");
        let mut session = Session::new();
        let SessionState::Previewing { image, preview } = previewing() else {
            unreachable!()
        };
        session.select_file(image, preview);

        calculate(&mut session, &client).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.outcome().unwrap().render(), "TOTAL CALORIES: 95");
    }

    #[test]
    fn resolved_menu_offers_rerun() {
        let SessionState::Previewing { image, preview } = previewing() else {
            unreachable!()
        };
        let state = SessionState::Resolved {
            image,
            preview,
            outcome: AnalysisOutcome::Failure {
                message: "x".to_string(),
            },
        };
        assert_eq!(menu_for(&state)[0].1, "Calculate Calories again");
    }
}
