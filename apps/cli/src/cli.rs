use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about = "Resumable chunked file upload", long_about = None)]
pub struct Cli {
    /// TOML file with the check/upload/merge endpoints
    #[arg(long, short)]
    pub config: PathBuf,

    /// File to upload
    pub file: PathBuf,

    /// Endpoint receiving `{"path": ...}` once the file is stored
    #[arg(long = "process-url")]
    pub process_url: String,

    /// Override the configured chunk size (bytes)
    #[arg(long)]
    pub chunk_size: Option<u64>,

    /// Override the configured number of simultaneous chunk transfers
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Name reported to the server instead of the file's own name
    #[arg(long)]
    pub name: Option<String>,
}
