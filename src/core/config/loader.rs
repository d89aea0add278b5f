#![allow(clippy::result_large_err)]

use super::{ConfigValidator, HeaderStampConfig};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const CONFIG_FILE_NAME: &str = "header-stamp.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config with precedence: defaults, config file, environment.
    ///
    /// An explicit path must exist; otherwise `header-stamp.toml` in the
    /// working directory is used when present.
    pub fn load(explicit: Option<&Path>) -> Result<HeaderStampConfig, AppError> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?.ok_or_else(|| {
                AppError::new(
                    ErrorCategory::ConfigError,
                    format!("Config file {} does not exist", path.display()),
                )
            })?,
            None => Self::load_from_file(Path::new(CONFIG_FILE_NAME))?.unwrap_or_default(),
        };

        Self::apply_env_overrides(&mut config);
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<HeaderStampConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let mut config: HeaderStampConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
        })?;
        config.source = Some(path.to_path_buf());

        Ok(Some(config))
    }

    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut HeaderStampConfig) {
        if let Ok(template) = env::var("HEADER_STAMP_TEMPLATE") {
            config.header.template = Some(template);
            config.header.template_file = None;
        }

        if let Ok(template_file) = env::var("HEADER_STAMP_TEMPLATE_FILE") {
            if config.header.template.is_none() {
                config.header.template_file = Some(PathBuf::from(template_file));
            }
        }

        if let Ok(streaming) = env::var("HEADER_STAMP_STREAMING") {
            if let Ok(streaming) = streaming.parse::<bool>() {
                config.header.streaming = streaming;
            }
        }
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "HEADER_STAMP_TEMPLATE - Override the header template text",
            "HEADER_STAMP_TEMPLATE_FILE - Read the header template from this file",
            "HEADER_STAMP_STREAMING - Read inputs as streams (true/false)",
            "HEADER_STAMP_LOG_DIR - Write logs to this directory",
        ]
    }
}
