//! Data types for the upload flow.

use std::fmt;

use crate::error::ChunkTransferError;

/// Lifecycle stage of one upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Idle,
    Hashing,
    Checking,
    AlreadyComplete,
    Uploading,
    Merging,
    Processing,
    Done,
    Failed,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UploadStage::Idle => "idle",
            UploadStage::Hashing => "hashing",
            UploadStage::Checking => "checking",
            UploadStage::AlreadyComplete => "already-complete",
            UploadStage::Uploading => "uploading",
            UploadStage::Merging => "merging",
            UploadStage::Processing => "processing",
            UploadStage::Done => "done",
            UploadStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// What the server reported on `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// The server already holds the whole file at `storage_path`.
    Complete { storage_path: String },
    /// Chunk indices still required; all within `[0, chunk_count)`.
    Missing(Vec<usize>),
}

/// Outcome of one required chunk transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    pub index: usize,
    pub outcome: Result<(), ChunkTransferError>,
}

impl ChunkResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Result of check + transfer + merge, before post-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The server already held the whole file.
    AlreadyComplete { storage_path: String },
    /// Missing chunks were sent; merged only if all of them succeeded.
    Transferred {
        all_chunks_succeeded: bool,
        storage_path: Option<String>,
        failed_chunks: Vec<usize>,
    },
}

impl UploadOutcome {
    /// Final storage path, if the file is durably assembled server-side.
    pub fn storage_path(&self) -> Option<&str> {
        match self {
            UploadOutcome::AlreadyComplete { storage_path } => Some(storage_path),
            UploadOutcome::Transferred { storage_path, .. } => storage_path.as_deref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, UploadOutcome::AlreadyComplete { .. })
    }
}
