#![allow(clippy::result_large_err)] // Stages return AppError directly for structured diagnostics.

use crate::core::error::AppError;
use crate::core::item::{ByteStream, Content, Item};
use crate::core::pipeline::Stage;
use crate::core::template::{RenderContext, Template};
use futures::stream::{self, StreamExt};
use serde_json::{Map, Value};
use tracing::debug;

/// How a [`HeaderPrepender`] treats the items it receives.
#[derive(Debug)]
pub enum HeaderMode {
    /// Empty header text: every item passes through untouched.
    NoOp,
    /// Text is prepended verbatim, without rendering.
    Literal(String),
    /// Compiled template rendered once per item.
    Active(Template),
}

/// Pipeline stage that prepends a rendered header to each item's content.
#[derive(Debug)]
pub struct HeaderPrepender {
    mode: HeaderMode,
    data: Map<String, Value>,
}

impl HeaderPrepender {
    /// Compile `template` against optional static `data`.
    ///
    /// Malformed template text fails here, before any item is seen. An empty
    /// template yields a no-op stage.
    pub fn create(template: &str, data: Option<Map<String, Value>>) -> Result<Self, AppError> {
        let mode = if template.is_empty() {
            HeaderMode::NoOp
        } else {
            HeaderMode::Active(Template::compile(template)?)
        };
        Ok(HeaderPrepender {
            mode,
            data: data.unwrap_or_default(),
        })
    }

    /// Prepend `text` as-is; placeholders are not interpreted.
    pub fn literal(text: &str) -> Self {
        let mode = if text.is_empty() {
            HeaderMode::NoOp
        } else {
            HeaderMode::Literal(text.to_string())
        };
        HeaderPrepender {
            mode,
            data: Map::new(),
        }
    }

    pub fn mode(&self) -> &HeaderMode {
        &self.mode
    }

    pub fn is_noop(&self) -> bool {
        matches!(self.mode, HeaderMode::NoOp)
    }

    /// Header text for `item`, without touching its content.
    pub fn render_for(&self, item: &Item) -> Result<String, AppError> {
        match &self.mode {
            HeaderMode::NoOp => Ok(String::new()),
            HeaderMode::Literal(text) => Ok(text.clone()),
            HeaderMode::Active(template) => {
                let ctx = RenderContext::for_item(&self.data, item);
                template.render(&ctx).map_err(|err| {
                    err.with_context("path", item.path().to_string_lossy())
                })
            }
        }
    }

    /// Replace `item.content` with the header followed by the original payload.
    ///
    /// On error the content is left as it was.
    pub fn process_in_place(&self, item: &mut Item) -> Result<(), AppError> {
        if self.is_noop() || item.content.is_none() {
            return Ok(());
        }

        let header = self.render_for(item)?;
        if let Some(content) = item.content.take() {
            debug!(
                path = %item.relative().display(),
                mode = %content.mode(),
                header_bytes = header.len(),
                "prepending header"
            );
            item.content = Some(prepend(header.into_bytes(), content));
        }
        Ok(())
    }

    pub fn process(&self, mut item: Item) -> Result<Item, AppError> {
        self.process_in_place(&mut item)?;
        Ok(item)
    }
}

impl Stage for HeaderPrepender {
    fn name(&self) -> &'static str {
        "HeaderPrepender"
    }

    fn process(&self, item: Item) -> Result<Item, AppError> {
        HeaderPrepender::process(self, item)
    }
}

/// Prepend `header` to a payload of either shape.
pub fn prepend(header: Vec<u8>, content: Content) -> Content {
    match content {
        Content::Buffer(bytes) => Content::Buffer(prepend_buffer(header, &bytes)),
        Content::Stream(inner) => Content::Stream(prepend_stream(header, inner)),
    }
}

pub fn prepend_buffer(header: Vec<u8>, bytes: &[u8]) -> Vec<u8> {
    let mut out = header;
    out.reserve_exact(bytes.len());
    out.extend_from_slice(bytes);
    out
}

/// Yield `header` as the first chunk, then every item of `inner` untouched.
///
/// `inner` is only polled when the returned stream is, so downstream
/// backpressure reaches the original producer. Dropping the returned stream
/// drops `inner`.
pub fn prepend_stream(header: Vec<u8>, inner: ByteStream) -> ByteStream {
    if header.is_empty() {
        return inner;
    }
    stream::once(async move { Ok(header) }).chain(inner).boxed()
}
