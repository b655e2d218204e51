//! Upload orchestrator: sequences hashing, check, chunk transfer, merge
//! and post-processing for one file.
//!
//! Nothing is retried. A caller resumes by invoking [`UploadClient::upload`]
//! again; the check step then reports only the chunks still missing.

use std::sync::Arc;

use chunkup_protocol::Envelope;
use chunkup_transfer::{
    ByteSource, Progress, ProgressCallback, UploadSession, digest, split, validate_file_name,
};
use tracing::{error, info};

use crate::config::ClientConfig;
use crate::error::UploadError;
use crate::transport::{HttpTransport, Transport};
use crate::types::{CheckResult, UploadOutcome, UploadStage};
use crate::{finalizer, negotiator, uploader};

/// Tracks the lifecycle stage of one attempt for logging.
struct Attempt {
    file: String,
    stage: UploadStage,
}

impl Attempt {
    fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            stage: UploadStage::Idle,
        }
    }

    fn enter(&mut self, stage: UploadStage) {
        info!(file = %self.file, from = %self.stage, to = %stage, "upload stage");
        self.stage = stage;
    }

    fn fail(&mut self, err: &UploadError) {
        if self.stage != UploadStage::Failed {
            error!(file = %self.file, stage = %self.stage, error = %err, "upload failed");
            self.stage = UploadStage::Failed;
        }
    }
}

/// Resumable chunked upload client.
///
/// Holds an immutable configuration and a transport; any number of
/// uploads may run through one client concurrently.
pub struct UploadClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl UploadClient {
    /// Validates `config` and builds an HTTP transport from it.
    pub fn new(config: ClientConfig) -> Result<Self, UploadError> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self { config, transport })
    }

    /// Uses a caller-supplied transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, UploadError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Runs check, chunk transfer and merge.
    ///
    /// Chunk failures do not produce `Err`: they are reported through
    /// [`UploadOutcome::Transferred`] with `all_chunks_succeeded == false`
    /// and merge is skipped. Every other failure is fatal.
    pub async fn transfer(
        &self,
        file: Arc<dyn ByteSource>,
        progress: &ProgressCallback,
    ) -> Result<UploadOutcome, UploadError> {
        let mut attempt = Attempt::new(file.name());
        let result = self.run_transfer(&file, progress, &mut attempt).await;
        if let Err(e) = &result {
            attempt.fail(e);
        }
        result
    }

    /// Uploads `file` and hands its storage path to `process_url`.
    ///
    /// Returns the process endpoint's response envelope. Any failure,
    /// including a single failed chunk, yields `Err`; use
    /// [`UploadError::sentinel`] for the wire-level failure value.
    pub async fn upload(
        &self,
        file: Arc<dyn ByteSource>,
        progress: &ProgressCallback,
        process_url: &str,
    ) -> Result<Envelope, UploadError> {
        let mut attempt = Attempt::new(file.name());
        let result = self
            .run_upload(&file, progress, process_url, &mut attempt)
            .await;
        if let Err(e) = &result {
            attempt.fail(e);
        }
        result
    }

    async fn run_upload(
        &self,
        file: &Arc<dyn ByteSource>,
        progress: &ProgressCallback,
        process_url: &str,
        attempt: &mut Attempt,
    ) -> Result<Envelope, UploadError> {
        let path = match self.run_transfer(file, progress, attempt).await? {
            UploadOutcome::AlreadyComplete { storage_path } => storage_path,
            UploadOutcome::Transferred {
                all_chunks_succeeded: true,
                storage_path: Some(path),
                ..
            } => path,
            UploadOutcome::Transferred { failed_chunks, .. } => {
                return Err(UploadError::AggregateUploadFailure {
                    failed: failed_chunks,
                });
            }
        };

        attempt.enter(UploadStage::Processing);
        let response = finalizer::process(self.transport.as_ref(), process_url, &path).await?;
        attempt.enter(UploadStage::Done);
        Ok(response)
    }

    async fn run_transfer(
        &self,
        file: &Arc<dyn ByteSource>,
        progress: &ProgressCallback,
        attempt: &mut Attempt,
    ) -> Result<UploadOutcome, UploadError> {
        let transport = self.transport.as_ref();
        let filename = file.name().to_string();

        attempt.enter(UploadStage::Hashing);
        progress(Progress::STARTED);
        validate_file_name(&filename)?;

        let ranges = split(file.size(), self.config.chunk_size)?;
        let digests = digest(
            Arc::clone(file),
            self.config.chunk_size,
            self.config.digest_mode,
        )
        .await?;
        let mut session = UploadSession::new(filename.as_str(), ranges, digests)?;
        let chunk_count = session.chunk_count();
        info!(
            file = %filename,
            size = file.size(),
            chunks = chunk_count,
            digest = %session.file_digest(),
            "file hashed"
        );

        attempt.enter(UploadStage::Checking);
        let check = negotiator::check(
            transport,
            &self.config.check_url,
            session.file_digest(),
            &filename,
            chunk_count,
        )
        .await?;

        let missing = match check {
            CheckResult::Complete { storage_path } => {
                attempt.enter(UploadStage::AlreadyComplete);
                return Ok(UploadOutcome::AlreadyComplete { storage_path });
            }
            CheckResult::Missing(missing) => missing,
        };
        session.set_missing(missing)?;

        attempt.enter(UploadStage::Uploading);
        info!(
            file = %filename,
            missing = session.missing().len(),
            chunks = chunk_count,
            concurrency = self.config.concurrency,
            "uploading missing chunks"
        );
        let results = uploader::upload_missing(
            transport,
            &self.config.upload_url,
            file,
            &session,
            self.config.concurrency,
            progress,
        )
        .await;

        let failed_chunks: Vec<usize> = results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.index)
            .collect();
        if !failed_chunks.is_empty() {
            error!(
                file = %filename,
                failed = ?failed_chunks,
                "chunk transfers failed, skipping merge"
            );
            attempt.stage = UploadStage::Failed;
            return Ok(UploadOutcome::Transferred {
                all_chunks_succeeded: false,
                storage_path: None,
                failed_chunks,
            });
        }

        attempt.enter(UploadStage::Merging);
        let storage_path = finalizer::merge(
            transport,
            &self.config.merge_url,
            &filename,
            session.file_digest(),
        )
        .await?;
        progress(Progress::new(chunk_count - 1, chunk_count));

        Ok(UploadOutcome::Transferred {
            all_chunks_succeeded: true,
            storage_path: Some(storage_path),
            failed_chunks: Vec::new(),
        })
    }
}
