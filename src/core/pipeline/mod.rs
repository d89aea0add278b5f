#![allow(clippy::result_large_err)] // Stage pipeline returns AppError for structured diagnostics.

use crate::core::error::AppError;
use crate::core::item::Item;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::sync::Arc;
use tracing::warn;

/// Ordered source of items.
pub type ItemStream = BoxStream<'static, Item>;

/// Pipeline output: processed items, or the error that dropped an item.
pub type ResultStream = BoxStream<'static, Result<Item, AppError>>;

/// One per-item transform inside a [`Pipeline`].
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Transform one item. An error drops the item from the output.
    fn process(&self, item: Item) -> Result<Item, AppError>;
}

/// Ordered chain of stages applied to every item.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn with_shared_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run one item through every stage, stopping at the first failure.
    pub fn process(&self, item: Item) -> Result<Item, AppError> {
        let mut current = item;
        for stage in &self.stages {
            current = stage.process(current).map_err(|mut err| {
                err.add_context("stage", stage.name());
                err
            })?;
        }
        Ok(current)
    }

    /// Map `upstream` through the stages.
    ///
    /// Exactly one output per input, in input order; the output ends when
    /// `upstream` ends. Errors are yielded in place of the dropped item and
    /// processing continues with the next one.
    pub fn run<S>(self, upstream: S) -> ResultStream
    where
        S: Stream<Item = Item> + Send + 'static,
    {
        self.try_run(upstream.map(Ok))
    }

    /// Like [`Pipeline::run`] for a fallible source: upstream errors are
    /// forwarded untouched and never reach the stages.
    pub fn try_run<S>(self, upstream: S) -> ResultStream
    where
        S: Stream<Item = Result<Item, AppError>> + Send + 'static,
    {
        upstream
            .map(move |item| {
                let result = self.process(item?);
                if let Err(err) = &result {
                    warn!(code = %err.code, "dropping item: {}", err.message);
                }
                result
            })
            .boxed()
    }
}

/// Ordered stream over an in-memory list of items.
pub fn from_items(items: Vec<Item>) -> ItemStream {
    stream::iter(items).boxed()
}
