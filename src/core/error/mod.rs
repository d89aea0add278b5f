use crate::core::types::{ErrorCategory, ErrorSeverity};
use std::collections::BTreeMap;

/// Malformed header template text.
pub const TEMPLATE_SYNTAX_CODE: &str = "HDR-TPL-001";
/// Template evaluation failed for one item.
pub const TEMPLATE_RENDER_CODE: &str = "HDR-TPL-002";
/// An incremental payload reported an error while draining.
pub const PAYLOAD_READ_CODE: &str = "HDR-PAY-001";
/// Invalid configuration or CLI input.
pub const CONFIG_CODE: &str = "HDR-CFG-001";

#[derive(Debug)]
pub struct AppError {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub code: String,
    pub message: String,
    pub context: BTreeMap<String, String>,
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        let (severity, code) = match category {
            ErrorCategory::TemplateSyntaxError => (ErrorSeverity::Fatal, TEMPLATE_SYNTAX_CODE),
            ErrorCategory::ConfigError => (ErrorSeverity::Fatal, CONFIG_CODE),
            ErrorCategory::TemplateRenderError => (ErrorSeverity::Error, TEMPLATE_RENDER_CODE),
            ErrorCategory::PayloadReadError => (ErrorSeverity::Error, PAYLOAD_READ_CODE),
            ErrorCategory::IoError => (ErrorSeverity::Error, "IO_ERROR"),
            ErrorCategory::InternalError => (ErrorSeverity::Fatal, "INTERNAL_ERROR"),
        };
        AppError {
            category,
            severity,
            code: code.to_string(),
            message: message.into(),
            context: BTreeMap::new(),
            source: None,
        }
    }

    pub fn with_source<T: Into<String>>(
        category: ErrorCategory,
        message: T,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        let mut error = AppError::new(category, message);
        error.source = Some(anyhow::anyhow!(source));
        error
    }

    /// Wrap an error raised by an incremental payload while it was drained.
    pub fn payload_read(err: std::io::Error) -> Self {
        let message = format!("failed to read payload: {}", err);
        AppError::with_source(ErrorCategory::PayloadReadError, message, Box::new(err))
    }

    pub fn with_context<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_code<T: Into<String>>(mut self, code: T) -> Self {
        self.code = code.into();
        self
    }

    pub fn add_context(&mut self, key: &str, value: &str) {
        self.context.insert(key.to_string(), value.to_string());
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == ErrorSeverity::Fatal
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.category, self.message)?;
        if !self.context.is_empty() {
            write!(f, " (Context: {:?})", self.context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, "\nCaused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError {
            category: ErrorCategory::InternalError,
            severity: ErrorSeverity::Fatal,
            code: "ANYHOW_ERROR".to_string(),
            message: e.to_string(),
            context: BTreeMap::new(),
            source: Some(e),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError {
            category: ErrorCategory::IoError,
            severity: ErrorSeverity::Error,
            code: "IO_ERROR".to_string(),
            message: e.to_string(),
            context: BTreeMap::new(),
            source: Some(anyhow::anyhow!(e)),
        }
    }
}
