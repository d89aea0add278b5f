#![allow(clippy::result_large_err)]

use crate::cli::args::{ApplyArgs, HeaderArgs, RenderArgs};
use crate::core::config::{ConfigLoader, HeaderStampConfig};
use crate::core::error::AppError;
use crate::core::header::HeaderPrepender;
use crate::core::item::Item;
use crate::core::pipeline::Pipeline;
use crate::core::types::ErrorCategory;
use crate::utils::files::{self, base_for, ReadMode};
use anyhow::anyhow;
use futures::StreamExt;
use serde_json::{Map, Value};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

/// Prepend the header to every input and write the results.
pub async fn apply(args: ApplyArgs) -> crate::Result<()> {
    let config = ConfigLoader::load(args.header.config.as_deref())?;
    let prepender = build_prepender(&args.header, &config)?;
    let mode = if args.streaming || config.header.streaming {
        ReadMode::Stream
    } else {
        ReadMode::Buffer
    };

    let total = args.paths.len();
    let items = files::read_items(args.paths, args.base, mode);
    let mut results = Pipeline::new().with_stage(prepender).try_run(items);
    let mut stdout = tokio::io::stdout();
    let mut written = 0usize;
    let mut failed = 0usize;

    while let Some(result) = results.next().await {
        let item = match result {
            Ok(item) => item,
            Err(err) if err.category == ErrorCategory::TemplateRenderError => {
                error!(code = %err.code, "{}", err);
                failed += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let outcome = match &args.out_dir {
            Some(out_dir) => files::write_item(item, out_dir).await.map(|_| ()),
            None => match item.content {
                Some(content) => files::copy_content(content, &mut stdout).await.map(|_| ()),
                None => Ok(()),
            },
        };
        match outcome {
            Ok(()) => written += 1,
            Err(err) if err.category == ErrorCategory::PayloadReadError => {
                error!(code = %err.code, "{}", err);
                failed += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    stdout.flush().await?;

    info!(total, written, failed, "header-stamp apply finished");
    if failed > 0 {
        return Err(anyhow!("{} of {} items failed", failed, total));
    }
    Ok(())
}

/// Print the header rendered for a single path.
pub async fn render(args: RenderArgs) -> crate::Result<()> {
    let config = ConfigLoader::load(args.header.config.as_deref())?;
    let prepender = build_prepender(&args.header, &config)?;
    let base = base_for(&args.path, args.base.as_deref());
    let item = Item::new(&args.path).with_base(base);

    let header = prepender.render_for(&item)?;
    let mut stdout = tokio::io::stdout();
    stdout.write_all(header.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

/// Build the header stage from CLI flags layered over the loaded configuration.
pub fn build_prepender(
    args: &HeaderArgs,
    config: &HeaderStampConfig,
) -> Result<HeaderPrepender, AppError> {
    let template = match (&args.template, &args.template_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to read template file {}: {}", path.display(), e),
            )
        })?,
        (None, None) => config.resolve_template()?.unwrap_or_default(),
    };

    if args.literal || config.header.literal {
        return Ok(HeaderPrepender::literal(&template));
    }

    let mut data = config.data.clone();
    if let Some(path) = &args.data_file {
        data.extend(load_data_file(path)?);
    }
    for pair in &args.data {
        let (key, value) = parse_data_pair(pair)?;
        data.insert(key, value);
    }
    HeaderPrepender::create(&template, Some(data))
}

/// Split `KEY=VALUE`; VALUE is JSON when it parses, a plain string otherwise.
pub fn parse_data_pair(pair: &str) -> Result<(String, Value), AppError> {
    let (key, raw) = pair.split_once('=').ok_or_else(|| {
        AppError::new(
            ErrorCategory::ConfigError,
            format!("invalid --data '{}': expected KEY=VALUE", pair),
        )
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::new(
            ErrorCategory::ConfigError,
            format!("invalid --data '{}': key cannot be empty", pair),
        ));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn load_data_file(path: &Path) -> Result<Map<String, Value>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::new(
            ErrorCategory::ConfigError,
            format!("Failed to read data file {}: {}", path.display(), e),
        )
    })?;
    match serde_json::from_str(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::new(
            ErrorCategory::ConfigError,
            format!("Data file {} must contain a JSON object", path.display()),
        )),
        Err(e) => Err(AppError::new(
            ErrorCategory::ConfigError,
            format!("Failed to parse data file {}: {}", path.display(), e),
        )),
    }
}
