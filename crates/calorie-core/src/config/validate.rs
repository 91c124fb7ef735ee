//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if self.upload.accepted_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "upload.accepted_extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .upload
            .accepted_extensions
            .iter()
            .find(|ext| crate::upload::media_type_for_extension(ext).is_none())
        {
            return Err(ConfigError::ValidationError(format!(
                "upload.accepted_extensions: no known image type for '{ext}'"
            )));
        }
        if self.preview.width == 0 {
            return Err(ConfigError::ValidationError(
                "preview.width must be > 0".into(),
            ));
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "llm.max_tokens must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.decode_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("decode_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_empty_extension_list() {
        let mut config = Config::default();
        config.upload.accepted_extensions.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("accepted_extensions"));
    }

    #[test]
    fn test_validate_rejects_unknown_extension() {
        let mut config = Config::default();
        config.upload.accepted_extensions.push("heic".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("heic"));
    }

    #[test]
    fn test_validate_rejects_webp_extension() {
        let mut config = Config::default();
        config.upload.accepted_extensions.push("webp".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("webp"));
    }

    #[test]
    fn test_validate_rejects_invalid_temperature() {
        let mut config = Config::default();
        config.llm.temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));

        config.llm.temperature = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }
}
