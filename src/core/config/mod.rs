#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub mod loader;
pub mod validation;

pub use loader::{ConfigLoader, CONFIG_FILE_NAME};
pub use validation::ConfigValidator;

/// Configuration loaded from header-stamp.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HeaderStampConfig {
    /// Header template settings
    #[serde(default)]
    pub header: HeaderSection,

    /// Static data exposed to the template
    #[serde(default)]
    pub data: Map<String, Value>,

    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// `[header]` table
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HeaderSection {
    /// Inline header template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Template read from a file, relative to the config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_file: Option<PathBuf>,

    /// Prepend the text verbatim instead of rendering it
    #[serde(default)]
    pub literal: bool,

    /// Read input files as incremental streams
    #[serde(default)]
    pub streaming: bool,
}

impl HeaderStampConfig {
    /// Directory relative paths in the config resolve against.
    pub fn base_dir(&self) -> &Path {
        self.source
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."))
    }

    /// Header text from `template` or `template_file`; `None` when neither is set.
    pub fn resolve_template(&self) -> Result<Option<String>, AppError> {
        if let Some(template) = &self.header.template {
            return Ok(Some(template.clone()));
        }
        let Some(file) = &self.header.template_file else {
            return Ok(None);
        };
        let path = self.base_dir().join(file);
        let text = std::fs::read_to_string(&path).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to read template file {}: {}", path.display(), e),
            )
        })?;
        Ok(Some(text))
    }
}
