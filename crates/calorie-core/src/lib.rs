//! Calorie Advisor Core - food photo in, calorie breakdown out.
//!
//! A user-supplied food photo is loaded, previewed, adapted into a one-part
//! multimodal request, and sent with a fixed prompt to a vision model. The
//! model's text is returned as-is.
//!
//! # Architecture
//!
//! ```text
//! File → UploadedImage → ImagePreview (decode check)
//!                      → prepare_image → AnalysisClient (+ ANALYSIS_PROMPT) → AnalysisOutcome
//! ```
//!
//! [`Session`] ties these together as a small state machine so a front end
//! only has to forward user actions.
//!
//! # Usage
//!
//! ```rust,ignore
//! use calorie_core::{AnalysisClient, AnalyzeOptions, Config, ImagePreview, LlmProviderFactory, Session, UploadedImage};
//!
//! #[tokio::main]
//! async fn main() -> calorie_core::Result<()> {
//!     let config = Config::load()?;
//!     let provider = LlmProviderFactory::create("gemini", &config, None)?;
//!     let client = AnalysisClient::new(provider, AnalyzeOptions::from_config(&config));
//!
//!     let image = UploadedImage::load("lunch.jpg".as_ref(), &config.upload, &config.limits)?;
//!     let preview = ImagePreview::decode(&image, &config.limits, 0).await?;
//!
//!     let mut session = Session::new();
//!     session.select_file(image, preview);
//!     if let Ok(outcome) = session.analyze(&client).await {
//!         println!("{}", outcome.render());
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod adapter;
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod preview;
pub mod prompt;
pub mod session;
pub mod upload;

// Re-exports for convenient access
pub use adapter::{prepare_image, ImagePart};
pub use config::Config;
pub use error::{AdvisorError, AnalysisError, ConfigError, Result, UploadError};
pub use llm::{
    AnalysisClient, AnalysisOutcome, AnalyzeOptions, Banner, LlmProvider, LlmProviderFactory,
    ERROR_PREFIX,
};
pub use output::{AnalysisRecord, AnalysisStatus};
pub use preview::ImagePreview;
pub use prompt::ANALYSIS_PROMPT;
pub use session::{Session, SessionState, TriggerRejected};
pub use upload::UploadedImage;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
