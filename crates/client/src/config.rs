//! Client configuration.
//!
//! Built once, validated when handed to [`UploadClient`](crate::UploadClient)
//! and never mutated afterwards. Can be loaded from TOML:
//!
//! ```toml
//! check_url = "https://files.example.com/multipart/check"
//! upload_url = "https://files.example.com/multipart/upload"
//! merge_url = "https://files.example.com/multipart/merge"
//! chunk_size = 10485760
//! concurrency = 5
//! digest_mode = "offloaded"
//!
//! [headers]
//! Authorization = "Bearer ..."
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use chunkup_transfer::{DEFAULT_CHUNK_SIZE, DigestMode};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_CONCURRENCY;
use crate::error::UploadError;

/// Endpoints and tuning for an upload client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// GET endpoint reporting which chunks the server still needs.
    pub check_url: String,

    /// POST endpoint receiving one multipart chunk per request.
    pub upload_url: String,

    /// POST endpoint assembling the uploaded chunks.
    pub merge_url: String,

    /// Nominal chunk size in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Maximum simultaneous chunk transfers.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Where file hashing runs.
    #[serde(default)]
    pub digest_mode: DigestMode,

    /// Per-request timeout in seconds (0 = none).
    #[serde(default)]
    pub request_timeout_secs: u64,

    /// Extra headers sent with every request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl ClientConfig {
    /// Creates a configuration with default tuning.
    pub fn new(
        check_url: impl Into<String>,
        upload_url: impl Into<String>,
        merge_url: impl Into<String>,
    ) -> Self {
        Self {
            check_url: check_url.into(),
            upload_url: upload_url.into(),
            merge_url: merge_url.into(),
            chunk_size: default_chunk_size(),
            concurrency: default_concurrency(),
            digest_mode: DigestMode::default(),
            request_timeout_secs: 0,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_digest_mode(mut self, mode: DigestMode) -> Self {
        self.digest_mode = mode;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, UploadError> {
        toml::from_str(content).map_err(|e| UploadError::Config(e.to_string()))
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, UploadError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| UploadError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "client configuration loaded");
        Ok(config)
    }

    /// Rejects configurations that cannot drive an upload.
    pub fn validate(&self) -> Result<(), UploadError> {
        for (name, url) in [
            ("check_url", &self.check_url),
            ("upload_url", &self.upload_url),
            ("merge_url", &self.merge_url),
        ] {
            if url.trim().is_empty() {
                return Err(UploadError::Config(format!("{name} is empty")));
            }
        }
        if self.chunk_size == 0 {
            return Err(UploadError::Config("chunk_size must be positive".into()));
        }
        if self.concurrency == 0 {
            return Err(UploadError::Config("concurrency must be positive".into()));
        }
        Ok(())
    }

    /// Per-request timeout, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
