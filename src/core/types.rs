use serde::{Deserialize, Serialize};

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    TemplateSyntaxError,
    TemplateRenderError,
    PayloadReadError,
    ConfigError,
    IoError,
    InternalError,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error severity enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Aborts setup; nothing is emitted.
    Fatal,
    /// Drops a single item; the stream keeps going.
    Error,
}

/// Shape of an item's payload, as reported in logs and template context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadMode {
    Null,
    Buffer,
    Stream,
}

impl std::fmt::Display for PayloadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadMode::Null => write!(f, "null"),
            PayloadMode::Buffer => write!(f, "buffer"),
            PayloadMode::Stream => write!(f, "stream"),
        }
    }
}
