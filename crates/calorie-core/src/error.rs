//! Error types for Calorie Advisor.
//!
//! Errors are split by the boundary they come from: configuration, the upload
//! loader, and the analysis path. Analysis errors never leave
//! [`AnalysisClient`](crate::llm::AnalysisClient) as errors; they are folded
//! into a failure outcome there.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Calorie Advisor operations.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Upload loading errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Analysis errors (provider construction, preview decode)
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while turning a file on disk into an [`UploadedImage`](crate::upload::UploadedImage).
#[derive(Error, Debug)]
pub enum UploadError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Extension is not in the accepted list
    #[error("Unsupported file type for {path}: {extension} (accepted: {accepted})")]
    UnsupportedFormat {
        path: PathBuf,
        extension: String,
        accepted: String,
    },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Zero-byte file
    #[error("File is empty: {0}")]
    Empty(PathBuf),

    /// Content does not match the declared image type
    #[error("Not a valid {media_type} image: {path}")]
    InvalidImage { path: PathBuf, media_type: String },

    /// Reading the file failed
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors on the analysis path: provider calls and preview decoding.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Remote model call failed
    #[error("{message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// Operation timed out
    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Preview decoding failed
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Image dimensions exceed limit
    #[error("Image too large: {width}x{height} > {max_dim}")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Provider name not recognized
    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),
}

/// Convenience type alias for Calorie Advisor results.
pub type Result<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_displays_bare_message() {
        let err = AnalysisError::Llm {
            message: "timeout".to_string(),
            status_code: None,
        };
        assert_eq!(err.to_string(), "timeout");
    }

    #[test]
    fn test_upload_error_wraps_into_advisor_error() {
        let err: AdvisorError = UploadError::Empty(PathBuf::from("lunch.png")).into();
        assert!(err.to_string().contains("lunch.png"));
    }
}
