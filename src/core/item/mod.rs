//! File-like units of work flowing through a pipeline.
//!
//! An [`Item`] carries three normalized paths (`cwd`, `base`, `path`), an
//! optional payload and a free-form metadata map. Payloads are either fully
//! materialized ([`Content::Buffer`]) or delivered incrementally by a byte
//! stream ([`Content::Stream`]).

use crate::core::types::PayloadMode;
use futures::stream::BoxStream;
use serde_json::{json, Map, Value};
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Incremental payload: an ordered, producer-driven channel of byte chunks.
pub type ByteStream = BoxStream<'static, io::Result<Vec<u8>>>;

/// Payload carried by an item.
pub enum Content {
    Buffer(Vec<u8>),
    Stream(ByteStream),
}

impl Content {
    pub fn mode(&self) -> PayloadMode {
        match self {
            Content::Buffer(_) => PayloadMode::Buffer,
            Content::Stream(_) => PayloadMode::Stream,
        }
    }

    /// Returns the bytes of a materialized payload.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Content::Buffer(bytes) => Some(bytes),
            Content::Stream(_) => None,
        }
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            Content::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Content::Buffer(bytes)
    }
}

impl From<ByteStream> for Content {
    fn from(stream: ByteStream) -> Self {
        Content::Stream(stream)
    }
}

/// One unit of work: a file path, its payload and side-channel metadata.
#[derive(Debug)]
pub struct Item {
    cwd: PathBuf,
    base: PathBuf,
    path: PathBuf,
    /// `None` for directories and placeholders.
    pub content: Option<Content>,
    /// Per-item metadata, visible to header templates.
    pub data: Map<String, Value>,
}

impl Item {
    /// Create a content-less item. `cwd` defaults to `.`, `base` to `cwd`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Item {
            cwd: PathBuf::new(),
            base: PathBuf::new(),
            path: normalize(path.as_ref()),
            content: None,
            data: Map::new(),
        }
    }

    /// Set the working directory; a base equal to the old cwd follows along.
    pub fn with_cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        let cwd = normalize(cwd.as_ref());
        if self.base == self.cwd {
            self.base = cwd.clone();
        }
        self.cwd = cwd;
        self
    }

    pub fn with_base(mut self, base: impl AsRef<Path>) -> Self {
        self.base = normalize(base.as_ref());
        self
    }

    pub fn with_buffer(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.content = Some(Content::Buffer(bytes.into()));
        self
    }

    pub fn with_stream(mut self, stream: ByteStream) -> Self {
        self.content = Some(Content::Stream(stream));
        self
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn cwd(&self) -> &Path {
        display_root(&self.cwd)
    }

    pub fn base(&self) -> &Path {
        display_root(&self.base)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path relative to `base`; the full path when it lies outside of it.
    pub fn relative(&self) -> &Path {
        self.path.strip_prefix(&self.base).unwrap_or(&self.path)
    }

    pub fn dirname(&self) -> &Path {
        self.path.parent().map(display_root).unwrap_or(Path::new("."))
    }

    pub fn basename(&self) -> String {
        os_str_lossy(self.path.file_name())
    }

    pub fn stem(&self) -> String {
        os_str_lossy(self.path.file_stem())
    }

    /// Extension including the leading dot, or an empty string.
    pub fn extname(&self) -> String {
        self.path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    pub fn payload_mode(&self) -> PayloadMode {
        self.content
            .as_ref()
            .map(Content::mode)
            .unwrap_or(PayloadMode::Null)
    }

    pub fn is_null(&self) -> bool {
        self.content.is_none()
    }

    pub fn is_buffer(&self) -> bool {
        self.payload_mode() == PayloadMode::Buffer
    }

    pub fn is_stream(&self) -> bool {
        self.payload_mode() == PayloadMode::Stream
    }

    /// Snapshot of the item's fields as exposed to header templates.
    pub fn context_value(&self) -> Value {
        json!({
            "cwd": self.cwd().to_string_lossy(),
            "base": self.base().to_string_lossy(),
            "path": self.path.to_string_lossy(),
            "relative": self.relative().to_string_lossy(),
            "dirname": self.dirname().to_string_lossy(),
            "basename": self.basename(),
            "stem": self.stem(),
            "extname": self.extname(),
            "data": Value::Object(self.data.clone()),
            "is_buffer": self.is_buffer(),
            "is_stream": self.is_stream(),
        })
    }
}

/// Drop `.` components so `./test/fixture/file.txt` becomes `test/fixture/file.txt`.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

fn display_root(path: &Path) -> &Path {
    if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    }
}

fn os_str_lossy(value: Option<&std::ffi::OsStr>) -> String {
    value
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
