//! Interaction state machine for one user session.
//!
//! ```text
//!            select_file            begin_analysis           resolve
//!   Idle ───────────────▶ Previewing ─────────────▶ Analyzing ───────▶ Resolved
//!                            ▲  ▲                                        │
//!                            │  └──────────── select_file ───────────────┤
//!                            └─────────────── begin_analysis (again) ────┘ (to Analyzing)
//! ```
//!
//! Selecting a file from any state starts over in `Previewing`. Triggering
//! without a file is rejected and leaves the state alone, as is a second
//! trigger while a call is in flight.

use crate::adapter::{prepare_image, ImagePart};
use crate::llm::{AnalysisClient, AnalysisOutcome};
use crate::preview::ImagePreview;
use crate::prompt::ANALYSIS_PROMPT;
use crate::upload::UploadedImage;

/// Why a trigger was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TriggerRejected {
    /// No file has been uploaded yet
    #[error("Please upload an image first!")]
    NoImage,
    /// An analysis is already in flight
    #[error("An analysis is already running.")]
    Busy,
}

/// Where the session currently is.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Previewing {
        image: UploadedImage,
        preview: ImagePreview,
    },
    Analyzing {
        image: UploadedImage,
        preview: ImagePreview,
    },
    Resolved {
        image: UploadedImage,
        preview: ImagePreview,
        outcome: AnalysisOutcome,
    },
}

impl SessionState {
    /// Short state name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Previewing { .. } => "previewing",
            SessionState::Analyzing { .. } => "analyzing",
            SessionState::Resolved { .. } => "resolved",
        }
    }
}

/// Drives upload, trigger and result display for one user.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The current upload, if any.
    pub fn image(&self) -> Option<&UploadedImage> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Previewing { image, .. }
            | SessionState::Analyzing { image, .. }
            | SessionState::Resolved { image, .. } => Some(image),
        }
    }

    /// The displayed result, if the session is resolved.
    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match &self.state {
            SessionState::Resolved { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// A new file was chosen. Drops any previous file and result.
    pub fn select_file(&mut self, image: UploadedImage, preview: ImagePreview) {
        tracing::debug!(
            from = self.state.name(),
            file = image.file_name(),
            "File selected"
        );
        self.state = SessionState::Previewing { image, preview };
    }

    /// The user pressed the trigger.
    ///
    /// On success the session moves to `Analyzing` and the adapted parts are
    /// returned for the client call. Rejections leave the state unchanged.
    pub fn begin_analysis(&mut self) -> Result<Vec<ImagePart>, TriggerRejected> {
        let (image, preview) = match std::mem::take(&mut self.state) {
            SessionState::Previewing { image, preview }
            | SessionState::Resolved { image, preview, .. } => (image, preview),
            SessionState::Idle => {
                tracing::warn!("Analysis triggered with no upload");
                return Err(TriggerRejected::NoImage);
            }
            busy @ SessionState::Analyzing { .. } => {
                self.state = busy;
                tracing::warn!("Analysis triggered while one is in flight");
                return Err(TriggerRejected::Busy);
            }
        };

        let parts = prepare_image(Some(&image)).unwrap_or_default();
        self.state = SessionState::Analyzing { image, preview };
        Ok(parts)
    }

    /// The client returned. Only meaningful while `Analyzing`.
    pub fn resolve(&mut self, outcome: AnalysisOutcome) {
        match std::mem::take(&mut self.state) {
            SessionState::Analyzing { image, preview } => {
                tracing::debug!(success = outcome.is_success(), "Analysis resolved");
                self.state = SessionState::Resolved {
                    image,
                    preview,
                    outcome,
                };
            }
            other => {
                tracing::warn!(state = other.name(), "Ignoring result outside of analysis");
                self.state = other;
            }
        }
    }

    /// Trigger, call the client once with the fixed prompt, and resolve.
    pub async fn analyze(
        &mut self,
        client: &AnalysisClient,
    ) -> Result<&AnalysisOutcome, TriggerRejected> {
        let parts = self.begin_analysis()?;
        let outcome = client.analyze(&parts, ANALYSIS_PROMPT).await;
        self.resolve(outcome);
        // resolve() always lands in Resolved from Analyzing
        self.outcome().ok_or(TriggerRejected::Busy)
    }
}
