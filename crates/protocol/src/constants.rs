//! Protocol constants shared by client and fixtures.

/// `response_code` value signalling success.
pub const SUCCESS_CODE: i32 = 0;

/// `response_code` reported by the client itself when an upload attempt fails.
pub const FAILURE_CODE: i32 = -1;

/// Query parameter carrying the whole-file digest on `check`.
pub const PARAM_FILE_MD5: &str = "file_md5";

/// Query parameter carrying the total chunk count on `check`.
///
/// The name is historical: the value is a count, not a byte size.
pub const PARAM_CHUNK_SIZE: &str = "chunk_size";

/// Query parameter carrying the file name on `check`.
pub const PARAM_FILENAME: &str = "filename";

/// Multipart field holding the chunk bytes.
pub const FIELD_CHUNK: &str = "chunk";

/// Multipart field holding the chunk digest.
pub const FIELD_CHUNK_MD5: &str = "chunk_md5";

/// Multipart field holding the zero-based chunk index.
pub const FIELD_CHUNK_ID: &str = "chunk_id";

/// Multipart field holding the whole-file digest.
pub const FIELD_FILE_MD5: &str = "file_md5";
