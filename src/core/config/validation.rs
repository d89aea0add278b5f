#![allow(clippy::result_large_err)]

use super::HeaderStampConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &HeaderStampConfig) -> Result<(), AppError> {
        if config.header.template.is_some() && config.header.template_file.is_some() {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "header.template and header.template_file are mutually exclusive",
            ));
        }

        if let Some(file) = &config.header.template_file {
            if file.as_os_str().is_empty() {
                return Err(AppError::new(
                    ErrorCategory::ConfigError,
                    "header.template_file cannot be empty",
                ));
            }
        }

        Ok(())
    }
}
