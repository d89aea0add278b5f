use clap::Args;
use std::path::PathBuf;

/// Options shared by every command that builds a header.
#[derive(Args, Debug, Clone, Default)]
pub struct HeaderArgs {
    /// Header template text; `<%= expr %>` or `${expr}` placeholders
    #[arg(long, short = 't', value_name = "TEXT", conflicts_with = "template_file")]
    pub template: Option<String>,

    /// Read the header template from this file
    #[arg(long, value_name = "FILE")]
    pub template_file: Option<PathBuf>,

    /// Static template data; VALUE is parsed as JSON and falls back to a plain string
    #[arg(long = "data", short = 'd', value_name = "KEY=VALUE")]
    pub data: Vec<String>,

    /// JSON object merged into the template data
    #[arg(long, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Prepend the header verbatim, without interpreting placeholders
    #[arg(long)]
    pub literal: bool,

    /// Configuration file (default: ./header-stamp.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Files or directories to process, in order
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub header: HeaderArgs,

    /// Directory receiving processed files at their relative paths
    #[arg(
        long,
        value_name = "DIR",
        conflicts_with = "stdout",
        required_unless_present = "stdout"
    )]
    pub out_dir: Option<PathBuf>,

    /// Concatenate processed contents to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Read inputs incrementally instead of loading them into memory
    #[arg(long)]
    pub streaming: bool,

    /// Base directory relative paths are computed from (default: each input's parent)
    #[arg(long, value_name = "DIR")]
    pub base: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// File the header would be prepended to
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[command(flatten)]
    pub header: HeaderArgs,

    /// Base directory relative paths are computed from (default: the file's parent)
    #[arg(long, value_name = "DIR")]
    pub base: Option<PathBuf>,
}
