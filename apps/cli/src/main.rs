//! `chunkup` entry point.

mod app;
mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting chunkup");

    let rt = tokio::runtime::Runtime::new()?;
    let ok = rt.block_on(app::run(args))?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
