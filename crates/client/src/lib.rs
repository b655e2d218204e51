//! Resumable chunked upload client.
//!
//! An upload hashes the file, asks the server which chunks it still
//! needs, sends those with bounded concurrency, asks the server to merge
//! them and finally hands the stored path to a caller-supplied endpoint.
//!
//! ```no_run
//! # async fn run() -> Result<(), chunkup_client::UploadError> {
//! use std::sync::Arc;
//! use chunkup_client::{ClientConfig, LocalFile, UploadClient, progress_noop};
//!
//! let config = ClientConfig::new(
//!     "https://files.example.com/check",
//!     "https://files.example.com/upload",
//!     "https://files.example.com/merge",
//! );
//! let client = UploadClient::new(config)?;
//! let file = LocalFile::open(std::path::Path::new("movie.mp4"))
//!     .map_err(chunkup_client::TransferError::from)?;
//! let response = client
//!     .upload(Arc::new(file), &progress_noop(), "https://app.example.com/process")
//!     .await?;
//! println!("{}", response.response_code);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod finalizer;
pub mod negotiator;
pub mod orchestrator;
pub mod transport;
pub mod types;
pub mod uploader;

#[cfg(test)]
mod testing;

pub use config::ClientConfig;
pub use error::{ChunkTransferError, UploadError};
pub use orchestrator::UploadClient;
pub use transport::{HttpTransport, Transport, TransportFuture};
pub use types::{CheckResult, ChunkResult, UploadOutcome, UploadStage};

pub use chunkup_protocol::Envelope;
pub use chunkup_transfer::{
    ByteSource, DigestMode, HashError, LocalFile, MemorySource, Progress, ProgressCallback,
    TransferError, progress_channel, progress_noop,
};

/// Default maximum number of simultaneous chunk transfers.
pub const DEFAULT_CONCURRENCY: usize = 5;
