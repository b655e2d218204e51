use md5::{Digest, Md5};

use crate::TransferError;

// ---------------------------------------------------------------------------
// Checksum helpers
// ---------------------------------------------------------------------------

/// Computes MD5 of `data` and returns the lowercase hex digest.
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Byte ranges
// ---------------------------------------------------------------------------

/// Half-open `[start, end)` byte range within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits a file of `file_size` bytes into contiguous ranges of `chunk_size`.
///
/// `chunk_size` is clamped to `file_size`, so a file smaller than the
/// nominal size yields exactly one range. Every range except the last has
/// length `chunk_size`; together they cover `[0, file_size)`.
pub fn split(file_size: u64, chunk_size: u64) -> Result<Vec<ByteRange>, TransferError> {
    if chunk_size == 0 {
        return Err(TransferError::InvalidChunkSize(chunk_size));
    }
    if file_size == 0 {
        return Err(TransferError::EmptyFile);
    }

    let chunk_size = chunk_size.min(file_size);
    let count = file_size.div_ceil(chunk_size);
    let ranges = (0..count)
        .map(|i| {
            let start = i * chunk_size;
            ByteRange::new(start, (start + chunk_size).min(file_size))
        })
        .collect();
    Ok(ranges)
}
