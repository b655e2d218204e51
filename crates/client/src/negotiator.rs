//! Existence negotiation: asks the server which chunks it already holds.

use chunkup_protocol::{CheckData, CheckQuery};
use tracing::debug;

use crate::error::UploadError;
use crate::transport::Transport;
use crate::types::{CheckResult, UploadStage};

/// Queries `check_url` for the state of `(file_digest, filename)`.
///
/// A `complete` answer must carry the storage path; otherwise every
/// reported index must lie in `[0, chunk_count)`.
pub async fn check(
    transport: &dyn Transport,
    check_url: &str,
    file_digest: &str,
    filename: &str,
    chunk_count: usize,
) -> Result<CheckResult, UploadError> {
    let query = CheckQuery {
        file_md5: file_digest.to_string(),
        chunk_size: chunk_count,
        filename: filename.to_string(),
    };

    let env = transport.get(check_url, &query.to_pairs()).await?;
    if !env.is_success() {
        return Err(UploadError::protocol(
            UploadStage::Checking,
            env.response_code,
            env.message.unwrap_or_default(),
        ));
    }

    let data: CheckData = env.parse_data()?.ok_or_else(|| {
        UploadError::protocol(UploadStage::Checking, env.response_code, "missing data")
    })?;

    if data.status {
        let path = data.path.ok_or_else(|| {
            UploadError::protocol(
                UploadStage::Checking,
                env.response_code,
                "complete file reported without a path",
            )
        })?;
        debug!(file = %filename, path = %path, "server already holds file");
        return Ok(CheckResult::Complete { storage_path: path });
    }

    if let Some(&bad) = data.chunk_ids.iter().find(|&&i| i >= chunk_count) {
        return Err(UploadError::protocol(
            UploadStage::Checking,
            env.response_code,
            format!("chunk index {bad} out of range for {chunk_count} chunks"),
        ));
    }

    debug!(
        file = %filename,
        missing = data.chunk_ids.len(),
        chunks = chunk_count,
        "server reported missing chunks"
    );
    Ok(CheckResult::Missing(data.chunk_ids))
}
