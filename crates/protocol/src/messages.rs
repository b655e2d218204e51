use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{PARAM_CHUNK_SIZE, PARAM_FILE_MD5, PARAM_FILENAME};

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

/// Query string of the `check` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckQuery {
    pub file_md5: String,
    /// Total number of chunks (not a byte size).
    pub chunk_size: usize,
    pub filename: String,
}

impl CheckQuery {
    /// Returns the query as ordered key/value pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            (PARAM_FILE_MD5.into(), self.file_md5.clone()),
            (PARAM_CHUNK_SIZE.into(), self.chunk_size.to_string()),
            (PARAM_FILENAME.into(), self.filename.clone()),
        ]
    }
}

/// `data` payload of a successful `check` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckData {
    /// `true` when the server already holds the complete file.
    pub status: bool,
    /// Final storage path; present when `status` is `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Indices of the chunks the server still needs. Absent and `null`
    /// both mean none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chunk_ids: Vec<usize>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<usize>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// upload
// ---------------------------------------------------------------------------

/// Text fields of one multipart chunk upload. The chunk bytes travel
/// alongside as a separate binary part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkFields {
    pub chunk_md5: String,
    pub chunk_id: usize,
    pub file_md5: String,
}

// ---------------------------------------------------------------------------
// merge / process
// ---------------------------------------------------------------------------

/// JSON body of the `merge` request. A successful response carries the
/// final storage path as a bare string in `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub filename: String,
    pub file_md5: String,
}

/// JSON body posted to the caller-supplied process endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub path: String,
}
