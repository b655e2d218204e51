use std::collections::BTreeSet;

use crate::TransferError;
use crate::chunked::ByteRange;
use crate::digest::FileDigests;

/// One chunk of a file: its position, byte range and content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position in upload order.
    pub index: usize,
    /// Byte range within the file.
    pub range: ByteRange,
    /// MD5 hex digest of exactly `range`.
    pub digest: String,
}

/// Transient state of one upload attempt.
///
/// Owned by a single `upload` call and dropped when it returns; nothing
/// here is persisted. Resume works because the server remembers which
/// chunks it holds, not because the client does.
#[derive(Debug, Clone)]
pub struct UploadSession {
    file_name: String,
    file_digest: String,
    chunks: Vec<Chunk>,
    missing: BTreeSet<usize>,
}

impl UploadSession {
    /// Pairs the chunker's ranges with the digest engine's output.
    ///
    /// Until [`set_missing`](Self::set_missing) is called every chunk is
    /// considered required.
    pub fn new(
        file_name: impl Into<String>,
        ranges: Vec<ByteRange>,
        digests: FileDigests,
    ) -> Result<Self, TransferError> {
        if ranges.len() != digests.chunk_digests.len() {
            return Err(TransferError::ChunkCountMismatch {
                ranges: ranges.len(),
                digests: digests.chunk_digests.len(),
            });
        }

        let chunks: Vec<Chunk> = ranges
            .into_iter()
            .zip(digests.chunk_digests)
            .enumerate()
            .map(|(index, (range, digest))| Chunk {
                index,
                range,
                digest,
            })
            .collect();
        let missing = (0..chunks.len()).collect();

        Ok(Self {
            file_name: file_name.into(),
            file_digest: digests.file_digest,
            chunks,
            missing,
        })
    }

    /// Records the server-reported set of chunks still required.
    ///
    /// Every index must lie in `[0, chunk_count)`.
    pub fn set_missing(
        &mut self,
        indices: impl IntoIterator<Item = usize>,
    ) -> Result<(), TransferError> {
        let count = self.chunks.len();
        let mut missing = BTreeSet::new();
        for index in indices {
            if index >= count {
                return Err(TransferError::ChunkIndexOutOfRange { index, count });
            }
            missing.insert(index);
        }
        self.missing = missing;
        Ok(())
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_digest(&self) -> &str {
        &self.file_digest
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Indices the server still needs.
    pub fn missing(&self) -> &BTreeSet<usize> {
        &self.missing
    }

    /// Chunks to transfer, in index order.
    pub fn required_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.missing.iter().map(|&i| &self.chunks[i])
    }

    pub fn is_required(&self, index: usize) -> bool {
        self.missing.contains(&index)
    }

    /// Returns `true` for the final chunk of the file.
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.chunks.len()
    }
}
