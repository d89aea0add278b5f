#![allow(clippy::result_large_err)]

//! File-system glue: turn paths into items and items back into files.

use crate::core::error::AppError;
use crate::core::item::{ByteStream, Content, Item};
use crate::core::types::ErrorCategory;
use futures::stream::{self, BoxStream, StreamExt};
use std::path::{Component, Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Chunk size used when a file is read as a stream.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// How file contents are loaded into items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    #[default]
    Buffer,
    Stream,
}

/// Read `path` into an item whose `relative` path is computed against `base`.
///
/// Directories become content-less items.
pub async fn read_item(path: &Path, base: &Path, mode: ReadMode) -> Result<Item, AppError> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| io_error(format!("Failed to stat {}: {}", path.display(), e)))?;
    let item = Item::new(path).with_base(base);

    if metadata.is_dir() {
        return Ok(item);
    }

    match mode {
        ReadMode::Buffer => {
            let bytes = fs::read(path)
                .await
                .map_err(|e| io_error(format!("Failed to read {}: {}", path.display(), e)))?;
            Ok(item.with_buffer(bytes))
        }
        ReadMode::Stream => {
            let file = File::open(path)
                .await
                .map_err(|e| io_error(format!("Failed to open {}: {}", path.display(), e)))?;
            Ok(item.with_stream(file_stream(file)))
        }
    }
}

/// Read `paths` one at a time as the returned stream is polled.
///
/// Each item's base is `explicit_base` when given, otherwise the path's parent. At
/// most one file handle is opened ahead of the consumer.
pub fn read_items(
    paths: Vec<PathBuf>,
    explicit_base: Option<PathBuf>,
    mode: ReadMode,
) -> BoxStream<'static, Result<Item, AppError>> {
    stream::iter(paths)
        .then(move |path| {
            let base = base_for(&path, explicit_base.as_deref());
            async move { read_item(&path, &base, mode).await }
        })
        .boxed()
}

/// `explicit` when given, otherwise the parent directory of `path`.
pub fn base_for(path: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(base) => base.to_path_buf(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    }
}

/// Lazily read `file` in [`CHUNK_SIZE`] chunks; the handle closes when the stream is dropped.
pub fn file_stream(mut file: File) -> ByteStream {
    Box::pin(async_stream::stream! {
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            match file.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => yield Ok(buf[..n].to_vec()),
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    })
}

/// Collect a payload into memory. Stream errors become `PayloadReadError`.
pub async fn drain(content: Content) -> Result<Vec<u8>, AppError> {
    match content {
        Content::Buffer(bytes) => Ok(bytes),
        Content::Stream(mut stream) => {
            let mut out = Vec::new();
            while let Some(chunk) = stream.next().await {
                out.extend_from_slice(&chunk.map_err(AppError::payload_read)?);
            }
            Ok(out)
        }
    }
}

/// Copy a payload into `writer` chunk by chunk, returning the bytes written.
pub async fn copy_content<W>(content: Content, writer: &mut W) -> Result<u64, AppError>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    match content {
        Content::Buffer(bytes) => {
            writer.write_all(&bytes).await?;
            written += bytes.len() as u64;
        }
        Content::Stream(mut stream) => {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(AppError::payload_read)?;
                writer.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
        }
    }
    writer.flush().await?;
    Ok(written)
}

/// Write `item` under `out_dir` at its relative path. Content-less items create a directory.
///
/// Items whose path does not lie under their base are rejected; nothing is written.
pub async fn write_item(item: Item, out_dir: &Path) -> Result<PathBuf, AppError> {
    let target = output_target(&item, out_dir)?;
    let Some(content) = item.content else {
        fs::create_dir_all(&target).await.map_err(|e| {
            io_error(format!("Failed to create directory {}: {}", target.display(), e))
        })?;
        return Ok(target);
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            io_error(format!("Failed to create directory {}: {}", parent.display(), e))
        })?;
    }
    let mut file = File::create(&target)
        .await
        .map_err(|e| io_error(format!("Failed to create {}: {}", target.display(), e)))?;
    let written = copy_content(content, &mut file)
        .await
        .map_err(|err| err.with_context("path", target.to_string_lossy()))?;
    debug!(path = %target.display(), bytes = written, "wrote item");
    Ok(target)
}

/// Destination of `item` under `out_dir`, which it must not escape.
pub fn output_target(item: &Item, out_dir: &Path) -> Result<PathBuf, AppError> {
    let relative = item.relative();
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(AppError::new(
            ErrorCategory::ConfigError,
            format!(
                "{} is not under base {}; refusing to write outside {}",
                item.path().display(),
                item.base().display(),
                out_dir.display()
            ),
        )
        .with_context("path", item.path().to_string_lossy()));
    }
    Ok(out_dir.join(relative))
}

fn io_error(message: String) -> AppError {
    AppError::new(ErrorCategory::IoError, message)
}
