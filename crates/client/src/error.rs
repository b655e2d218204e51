//! Upload error types.

use chunkup_protocol::Envelope;
use chunkup_transfer::{HashError, TransferError};

use crate::types::UploadStage;

/// A single required chunk could not be transferred.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("chunk {index} transfer failed: {reason}")]
pub struct ChunkTransferError {
    pub index: usize,
    pub reason: String,
}

/// Errors produced during an upload attempt.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("{stage} rejected with response_code {code}: {message}")]
    Protocol {
        stage: UploadStage,
        code: i32,
        message: String,
    },

    #[error("{} chunk transfer(s) failed: {failed:?}", .failed.len())]
    AggregateUploadFailure { failed: Vec<usize> },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transfer error: {0}")]
    Transfer(TransferError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("task join error: {0}")]
    Task(String),
}

impl From<TransferError> for UploadError {
    fn from(e: TransferError) -> Self {
        match e {
            TransferError::Hash(h) => UploadError::Hash(h),
            TransferError::Task(msg) => UploadError::Task(msg),
            other => UploadError::Transfer(other),
        }
    }
}

impl UploadError {
    /// Shorthand for a protocol-level rejection.
    pub(crate) fn protocol(stage: UploadStage, code: i32, message: impl Into<String>) -> Self {
        UploadError::Protocol {
            stage,
            code,
            message: message.into(),
        }
    }

    /// The wire-level failure sentinel, `{"response_code": -1}`.
    pub fn sentinel(&self) -> Envelope {
        Envelope::sentinel()
    }
}
