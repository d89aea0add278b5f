pub mod args;
pub mod commands;

pub use args::{ApplyArgs, HeaderArgs, RenderArgs};
use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "header-stamp")]
#[command(version = crate::VERSION)]
#[command(about = "Prepend rendered header templates to files")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Templates see static data (--data, --data-file, [data]) plus the current file under `file`, e.g. <%= file.relative %>."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Prepend the header to every input file",
        long_about = "Apply renders the header once per input and writes header + original content, preserving each file's path relative to its base.",
        after_help = "Example:\n    header-stamp apply src/*.js --template '/* <%= file.relative %> */\\n' --out-dir dist"
    )]
    Apply(ApplyArgs),
    #[command(
        about = "Print the header rendered for one file",
        long_about = "Render evaluates the header template for PATH and prints it without reading or modifying the file.",
        after_help = "Example:\n    header-stamp render src/main.js --data license=MIT --template '// <%= license %>'"
    )]
    Render(RenderArgs),
}

impl Command {
    /// Header options of the command, used to locate configuration.
    pub fn header_args(&self) -> &HeaderArgs {
        match self {
            Command::Apply(args) => &args.header,
            Command::Render(args) => &args.header,
        }
    }

    /// True when stdout carries payload bytes rather than logs.
    pub fn writes_payload_to_stdout(&self) -> bool {
        match self {
            Command::Apply(args) => args.stdout,
            Command::Render(_) => true,
        }
    }
}

pub async fn run(args: Args) -> crate::Result<()> {
    match args.command {
        Command::Apply(apply_args) => commands::apply(apply_args).await,
        Command::Render(render_args) => commands::render(render_args).await,
    }
}
