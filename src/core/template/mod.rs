//! Header templates.
//!
//! A template is split once into literal text and placeholder expressions.
//! Two placeholder styles are understood:
//!
//! - tag style, `<%= expr %>`
//! - brace style, `${expr}`
//!
//! [`Delimiter::detect`] picks brace style whenever the text contains `${`
//! and tag style otherwise. Only the selected style is recognized; the other
//! one is copied through as literal text.

pub mod context;
pub mod expression;

pub use context::{RenderContext, FILENAME_KEY, FILE_KEY};
pub use expression::ExpressionEngine;

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use expression::stringify;
use rhai::AST;
use thiserror::Error;

/// Placeholder syntax used by a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `<%= expr %>`
    Tag,
    /// `${expr}`
    Brace,
}

impl Delimiter {
    pub fn detect(text: &str) -> Self {
        if text.contains("${") {
            Delimiter::Brace
        } else {
            Delimiter::Tag
        }
    }

    fn open(self) -> &'static str {
        match self {
            Delimiter::Tag => "<%=",
            Delimiter::Brace => "${",
        }
    }
}

/// Structural problems found while splitting template text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unclosed '{open}' placeholder opened at line {line}")]
    Unclosed { open: &'static str, line: usize },
    #[error("empty placeholder at line {line}")]
    EmptyExpression { line: usize },
}

enum Segment {
    Literal(String),
    Expression { source: String, ast: AST, line: usize },
}

/// Compiled header template.
pub struct Template {
    source: String,
    delimiter: Delimiter,
    segments: Vec<Segment>,
    engine: ExpressionEngine,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("source", &self.source)
            .field("delimiter", &self.delimiter)
            .field("segments", &self.segments.len())
            .finish()
    }
}

impl Template {
    /// Compile `text`, choosing the delimiter with [`Delimiter::detect`].
    pub fn compile(text: &str) -> Result<Self, AppError> {
        Self::compile_with(text, Delimiter::detect(text))
    }

    pub fn compile_with(text: &str, delimiter: Delimiter) -> Result<Self, AppError> {
        let engine = ExpressionEngine::default();
        let mut segments = Vec::new();
        for raw in split(text, delimiter).map_err(syntax_error)? {
            match raw {
                RawSegment::Literal(literal) => segments.push(Segment::Literal(literal)),
                RawSegment::Expression { source, line } => {
                    let ast = engine
                        .compile(&source)
                        .map_err(|err| err.with_context("line", line.to_string()))?;
                    segments.push(Segment::Expression { source, ast, line });
                }
            }
        }
        Ok(Template {
            source: text.to_string(),
            delimiter,
            segments,
            engine,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// True when the template contains no placeholders.
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    pub fn render(&self, ctx: &RenderContext) -> Result<String, AppError> {
        let mut output = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Expression { source, ast, line } => {
                    let value = self.engine.evaluate(ast, ctx).map_err(|err| {
                        err.with_context("expression", source.as_str())
                            .with_context("line", line.to_string())
                    })?;
                    output.push_str(&stringify(&value));
                }
            }
        }
        Ok(output)
    }
}

fn syntax_error(err: ParseError) -> AppError {
    AppError::with_source(
        ErrorCategory::TemplateSyntaxError,
        format!("invalid header template: {}", err),
        Box::new(err),
    )
}

#[derive(Debug, PartialEq, Eq)]
enum RawSegment {
    Literal(String),
    Expression { source: String, line: usize },
}

fn split(text: &str, delimiter: Delimiter) -> Result<Vec<RawSegment>, ParseError> {
    let open = delimiter.open();
    let mut segments = Vec::new();
    let mut rest = text;
    let mut line = 1;

    while let Some(start) = rest.find(open) {
        let literal = &rest[..start];
        if !literal.is_empty() {
            segments.push(RawSegment::Literal(literal.to_string()));
        }
        line += count_lines(literal);

        let body = &rest[start + open.len()..];
        let (end, close_len) =
            find_closing(body, delimiter).ok_or(ParseError::Unclosed { open, line })?;

        let source = body[..end].trim();
        if source.is_empty() {
            return Err(ParseError::EmptyExpression { line });
        }
        segments.push(RawSegment::Expression {
            source: source.to_string(),
            line,
        });
        line += count_lines(&body[..end]);
        rest = &body[end + close_len..];
    }

    if !rest.is_empty() {
        segments.push(RawSegment::Literal(rest.to_string()));
    }
    Ok(segments)
}

/// Byte offset and length of the delimiter closing a placeholder.
///
/// String literals are skipped for both styles, so `"%>"` or `"}"` inside a
/// string does not end the expression. Brace style also honors nested braces.
fn find_closing(body: &str, delimiter: Delimiter) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (index, ch) in body.char_indices() {
        if let Some(open_quote) = quote {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if ch == open_quote => quote = None,
                _ => {}
            }
            continue;
        }
        match (delimiter, ch) {
            (_, '"' | '`') => quote = Some(ch),
            (Delimiter::Tag, '%') if body[index..].starts_with("%>") => return Some((index, 2)),
            (Delimiter::Brace, '{') => depth += 1,
            (Delimiter::Brace, '}') if depth == 0 => return Some((index, 1)),
            (Delimiter::Brace, '}') => depth -= 1,
            _ => {}
        }
    }
    None
}

fn count_lines(text: &str) -> usize {
    text.matches('\n').count()
}
