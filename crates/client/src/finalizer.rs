//! Merge and post-process: the two calls that follow a fully successful
//! chunk transfer.

use chunkup_protocol::{Envelope, MergeRequest, ProcessRequest};
use tracing::debug;

use crate::error::UploadError;
use crate::transport::Transport;
use crate::types::UploadStage;

/// Asks the server to assemble the uploaded chunks.
///
/// Returns the final storage path carried as a bare string in `data`.
pub async fn merge(
    transport: &dyn Transport,
    merge_url: &str,
    filename: &str,
    file_digest: &str,
) -> Result<String, UploadError> {
    let body = serde_json::to_value(MergeRequest {
        filename: filename.to_string(),
        file_md5: file_digest.to_string(),
    })?;

    let env = transport.post_json(merge_url, &body).await?;
    if !env.is_success() {
        return Err(UploadError::protocol(
            UploadStage::Merging,
            env.response_code,
            env.message.unwrap_or_default(),
        ));
    }

    let path: String = env.parse_data()?.ok_or_else(|| {
        UploadError::protocol(UploadStage::Merging, env.response_code, "missing storage path")
    })?;
    debug!(file = %filename, path = %path, "chunks merged");
    Ok(path)
}

/// Hands the storage path to the caller's process endpoint.
///
/// The response envelope is returned as-is, including a non-success
/// `response_code`: interpreting it is the caller's business.
pub async fn process(
    transport: &dyn Transport,
    process_url: &str,
    path: &str,
) -> Result<Envelope, UploadError> {
    let body = serde_json::to_value(ProcessRequest {
        path: path.to_string(),
    })?;
    let env = transport.post_json(process_url, &body).await?;
    debug!(path = %path, response_code = env.response_code, "process endpoint answered");
    Ok(env)
}
