//! Whole-file and per-chunk MD5 digests.
//!
//! The whole-file digest is accumulated from the very same chunk buffers
//! that produce the per-chunk digests, so both always describe one read of
//! the file.

use std::sync::Arc;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chunked::split;
use crate::source::ByteSource;
use crate::{HashError, TransferError};

/// Where the digest computation runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestMode {
    /// On the blocking thread pool; inline when no tokio runtime is present.
    #[default]
    Offloaded,
    /// On the calling task.
    Inline,
}

/// Digests of a file and of each of its chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigests {
    pub file_digest: String,
    /// `chunk_digests[i]` is the digest of the `i`-th chunk range.
    pub chunk_digests: Vec<String>,
}

/// Computes the digests on the current thread.
pub fn digest_inline(
    source: &dyn ByteSource,
    chunk_size: u64,
) -> Result<FileDigests, TransferError> {
    let ranges = split(source.size(), chunk_size)?;
    let mut file_hasher = Md5::new();
    let mut chunk_digests = Vec::with_capacity(ranges.len());

    for (index, range) in ranges.into_iter().enumerate() {
        let buf = source
            .read_range(range)
            .map_err(|source| HashError { index, source })?;
        file_hasher.update(&buf);
        chunk_digests.push(hex::encode(Md5::digest(&buf)));
    }

    Ok(FileDigests {
        file_digest: hex::encode(file_hasher.finalize()),
        chunk_digests,
    })
}

/// Computes the digests according to `mode`.
///
/// Both modes produce identical output for identical input.
pub async fn digest(
    source: Arc<dyn ByteSource>,
    chunk_size: u64,
    mode: DigestMode,
) -> Result<FileDigests, TransferError> {
    match mode {
        DigestMode::Inline => digest_inline(source.as_ref(), chunk_size),
        DigestMode::Offloaded => match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle
                .spawn_blocking(move || digest_inline(source.as_ref(), chunk_size))
                .await
                .map_err(|e| TransferError::Task(e.to_string()))?,
            Err(_) => {
                debug!("no tokio runtime available, hashing inline");
                digest_inline(source.as_ref(), chunk_size)
            }
        },
    }
}
