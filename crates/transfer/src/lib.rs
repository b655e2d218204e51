//! Chunking and content addressing for resumable uploads.
//!
//! A file is split into fixed-size byte ranges, each range is hashed, and
//! the same ranges are streamed into one accumulator to produce the
//! whole-file digest. The result feeds an [`UploadSession`].

mod chunked;
mod digest;
mod progress;
mod source;
mod types;
mod validation;

pub use chunked::{ByteRange, checksum_bytes, split};
pub use digest::{DigestMode, FileDigests, digest, digest_inline};
pub use progress::{Progress, ProgressCallback, channel as progress_channel, noop as progress_noop};
pub use source::{ByteSource, LocalFile, MemorySource};
pub use types::{Chunk, UploadSession};
pub use validation::validate_file_name;

/// Default nominal chunk size: 10 MiB.
///
/// Files smaller than this are sent as a single chunk.
pub const DEFAULT_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// A chunk's bytes could not be read while hashing.
#[derive(Debug, thiserror::Error)]
#[error("failed to read chunk {index} for hashing: {source}")]
pub struct HashError {
    pub index: usize,
    #[source]
    pub source: std::io::Error,
}

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(u64),

    #[error("file is empty")]
    EmptyFile,

    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("{ranges} chunk ranges but {digests} chunk digests")]
    ChunkCountMismatch { ranges: usize, digests: usize },

    #[error("chunk index {index} out of range for {count} chunks")]
    ChunkIndexOutOfRange { index: usize, count: usize },

    #[error("digest task failed: {0}")]
    Task(String),
}
