//! Serializable record of one analysis, for scripted use.

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::AdvisorError;
use crate::llm::AnalysisOutcome;
use crate::upload::UploadedImage;

/// Whether the analysis produced model text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
    Error,
}

/// One analysis, as written by `calorie analyze --format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub file_name: String,
    pub media_type: String,
    pub provider: String,
    pub status: AnalysisStatus,
    /// Model text on success, `"Error: <message>"` otherwise
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl AnalysisRecord {
    pub fn new(image: &UploadedImage, provider: &str, outcome: &AnalysisOutcome) -> Self {
        let (status, model, tokens_used, latency_ms) = match outcome {
            AnalysisOutcome::Success(response) => (
                AnalysisStatus::Success,
                Some(response.model.clone()),
                response.tokens_used,
                Some(response.latency_ms),
            ),
            AnalysisOutcome::Failure { .. } => (AnalysisStatus::Error, None, None, None),
        };

        Self {
            file_name: image.file_name().to_string(),
            media_type: image.media_type().to_string(),
            provider: provider.to_string(),
            status,
            text: outcome.render(),
            model,
            tokens_used,
            latency_ms,
        }
    }

    /// Write the record as JSON followed by a newline.
    pub fn write_json<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), AdvisorError> {
        if pretty {
            serde_json::to_writer_pretty(&mut *writer, self)?;
        } else {
            serde_json::to_writer(&mut *writer, self)?;
        }
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
