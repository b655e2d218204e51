//! Runs one upload and reports the result on stdout.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chunkup_client::{ClientConfig, LocalFile, UploadClient, progress_channel};
use tracing::{error, info};

use crate::cli::Cli;

/// Builds the effective configuration from the TOML file plus flag overrides.
pub fn load_config(args: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(chunk_size) = args.chunk_size {
        config = config.with_chunk_size(chunk_size);
    }
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    Ok(config)
}

fn open_file(path: &Path, name: Option<&str>) -> anyhow::Result<LocalFile> {
    let file = LocalFile::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(match name {
        Some(name) => file.with_name(name),
        None => file,
    })
}

/// Returns `Ok(false)` when the upload failed; the failure sentinel has
/// then already been printed.
pub async fn run(args: Cli) -> anyhow::Result<bool> {
    let config = load_config(&args)?;
    let client = UploadClient::new(config)?;
    let file = open_file(&args.file, args.name.as_deref())?;
    info!(file = %args.file.display(), "uploading");

    let (progress, mut events) = progress_channel();
    let printer = tokio::spawn(async move {
        while let Some(p) = events.recv().await {
            eprintln!("progress {}/{}", p.completed, p.total);
        }
    });

    let result = client
        .upload(Arc::new(file), &progress, &args.process_url)
        .await;
    drop(progress);
    let _ = printer.await;

    match result {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(true)
        }
        Err(e) => {
            error!(error = %e, "upload failed");
            println!("{}", serde_json::to_string(&e.sentinel())?);
            Ok(false)
        }
    }
}
