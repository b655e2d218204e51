//! Bounded-concurrency transfer of the missing chunks.
//!
//! At most `concurrency` chunk requests are in flight; as soon as one
//! settles the next pending chunk starts. A failing chunk is recorded and
//! never cancels its siblings, so every required chunk is attempted
//! exactly once.

use std::sync::Arc;

use chunkup_protocol::ChunkFields;
use chunkup_transfer::{ByteSource, Chunk, Progress, ProgressCallback, UploadSession};
use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, warn};

use crate::error::ChunkTransferError;
use crate::transport::Transport;
use crate::types::ChunkResult;

/// Uploads every chunk the session marks as missing.
///
/// Returns one result per required chunk, sorted by index. Each
/// successful chunk except the file's last one reports
/// `(index, chunk_count)` progress.
pub async fn upload_missing(
    transport: &dyn Transport,
    upload_url: &str,
    source: &Arc<dyn ByteSource>,
    session: &UploadSession,
    concurrency: usize,
    progress: &ProgressCallback,
) -> Vec<ChunkResult> {
    let chunk_count = session.chunk_count();

    let mut results: Vec<ChunkResult> = stream::iter(session.required_chunks())
        .map(|chunk| async move {
            let outcome =
                upload_one(transport, upload_url, source, session.file_digest(), chunk).await;
            match &outcome {
                Ok(()) => {
                    debug!(chunk = chunk.index, chunks = chunk_count, "chunk uploaded");
                    if !session.is_last(chunk.index) {
                        progress(Progress::new(chunk.index, chunk_count));
                    }
                }
                Err(e) => warn!(chunk = chunk.index, error = %e.reason, "chunk upload failed"),
            }
            ChunkResult {
                index: chunk.index,
                outcome,
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    results.sort_by_key(|r| r.index);
    results
}

/// Reads one chunk's bytes and posts them.
async fn upload_one(
    transport: &dyn Transport,
    upload_url: &str,
    source: &Arc<dyn ByteSource>,
    file_digest: &str,
    chunk: &Chunk,
) -> Result<(), ChunkTransferError> {
    let fail = |reason: String| ChunkTransferError {
        index: chunk.index,
        reason,
    };

    let data = tokio::task::spawn_blocking({
        let source = Arc::clone(source);
        let range = chunk.range;
        move || source.read_range(range)
    })
    .await
    .map_err(|e| fail(format!("task join error: {e}")))?
    .map_err(|e| fail(format!("read failed: {e}")))?;

    let fields = ChunkFields {
        chunk_md5: chunk.digest.clone(),
        chunk_id: chunk.index,
        file_md5: file_digest.to_string(),
    };

    let env = transport
        .post_chunk(upload_url, &fields, data)
        .await
        .map_err(|e| fail(e.to_string()))?;

    if !env.is_success() {
        return Err(fail(format!(
            "response_code {}{}",
            env.response_code,
            env.message.map(|m| format!(": {m}")).unwrap_or_default()
        )));
    }
    Ok(())
}
