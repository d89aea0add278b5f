use clap::Parser;
use header_stamp::cli::{self, Args};
use header_stamp::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logging = logging::init(&args.command)?;
    cli::run(args).await
}
