pub mod config;
pub mod error;
pub mod header;
pub mod item;
pub mod pipeline;
pub mod template;
pub mod types;

pub use error::AppError;
pub use header::{HeaderMode, HeaderPrepender};
pub use item::{ByteStream, Content, Item};
pub use pipeline::{Pipeline, Stage};
pub use template::{Delimiter, RenderContext, Template};
pub use types::*;
