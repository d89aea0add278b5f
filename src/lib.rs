//! Prepend rendered header templates to files flowing through a pipeline.
//!
//! The heart of the crate is [`core::header::HeaderPrepender`], a pipeline
//! stage that renders a template once per [`core::item::Item`] and prepends
//! the result to the item's content, whether that content is an in-memory
//! buffer or an incremental byte stream.

pub mod cli;
pub mod core;
pub mod logging;
pub mod utils;

/// Current crate version string exposed for CLI and tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub type Result<T> = std::result::Result<T, anyhow::Error>;
