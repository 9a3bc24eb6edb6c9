use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::application::ports::{ArtifactStore, ArtifactStoreError, DeleteOutcome};
use crate::domain::{Artifact, ArtifactId, Caption, IdStrategy, UploadedImage};

use super::audio_pipeline::{AudioError, AudioPipeline};
use super::caption_pipeline::{CaptionError, CaptionPipeline};
use super::expiry_scheduler::{ExpiryScheduler, SchedulerError};

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub retention: Duration,
    pub public_base_url: String,
    pub id_strategy: IdStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Received,
    Validated,
    Captioned,
    Ready,
    Responded,
}

impl RequestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStage::Received => "RECEIVED",
            RequestStage::Validated => "VALIDATED",
            RequestStage::Captioned => "CAPTIONED",
            RequestStage::Ready => "READY",
            RequestStage::Responded => "RESPONDED",
        }
    }
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct NarrationResult {
    pub caption: Caption,
    pub artifact_id: ArtifactId,
    pub audio_url: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RestoreReport {
    pub purged: usize,
    pub rescheduled: usize,
    pub failed: usize,
}

pub struct RequestOrchestrator {
    caption_pipeline: Arc<CaptionPipeline>,
    audio_pipeline: Arc<AudioPipeline>,
    scheduler: Arc<ExpiryScheduler>,
    store: Arc<dyn ArtifactStore>,
    config: OrchestratorConfig,
}

impl RequestOrchestrator {
    pub fn new(
        caption_pipeline: Arc<CaptionPipeline>,
        audio_pipeline: Arc<AudioPipeline>,
        scheduler: Arc<ExpiryScheduler>,
        store: Arc<dyn ArtifactStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            caption_pipeline,
            audio_pipeline,
            scheduler,
            store,
            config,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.caption_pipeline.max_upload_bytes()
    }

    pub fn scheduler(&self) -> &ExpiryScheduler {
        &self.scheduler
    }

    #[tracing::instrument(
        skip(self, upload),
        fields(filename = upload.filename.as_deref().unwrap_or("unknown"))
    )]
    pub async fn narrate(
        &self,
        upload: UploadedImage,
    ) -> Result<NarrationResult, OrchestratorError> {
        let mut stage = RequestStage::Received;
        tracing::debug!(%stage, declared_size = upload.declared_size, "Upload received");

        self.validate(&upload)?;
        stage = RequestStage::Validated;
        tracing::debug!(%stage, "Upload validated");

        let UploadedImage { filename, data, .. } = upload;
        let caption = self.caption_pipeline.caption(data).await?;
        stage = RequestStage::Captioned;
        tracing::debug!(%stage, caption = %caption, "Caption ready");

        let artifact_id = ArtifactId::from_filename(filename.as_deref(), self.config.id_strategy);

        // Runs detached so a dropped request cannot stop between the write
        // and the expiry registration.
        let publish = tokio::spawn(publish_with_expiry(
            Arc::clone(&self.audio_pipeline),
            Arc::clone(&self.scheduler),
            Arc::clone(&self.store),
            caption.clone(),
            artifact_id,
            self.config.retention,
        ));
        let artifact = publish
            .await
            .map_err(|e| OrchestratorError::Task(e.to_string()))??;
        stage = RequestStage::Ready;
        tracing::debug!(%stage, artifact_id = %artifact.id, "Artifact available");

        let audio_url = self.audio_url(&artifact.id);
        stage = RequestStage::Responded;
        tracing::info!(
            %stage,
            artifact_id = %artifact.id,
            audio_url = %audio_url,
            "Narration completed"
        );

        Ok(NarrationResult {
            caption,
            artifact_id: artifact.id,
            audio_url,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_artifact(&self, raw_id: &str) -> Result<Vec<u8>, OrchestratorError> {
        let id = ArtifactId::parse(raw_id)
            .map_err(|_| OrchestratorError::NotFound(raw_id.to_string()))?;

        match self.store.get(&id).await {
            Ok(bytes) => Ok(bytes),
            Err(ArtifactStoreError::NotFound(_)) => {
                Err(OrchestratorError::NotFound(id.to_string()))
            }
            Err(e) => Err(OrchestratorError::Storage(e)),
        }
    }

    /// Re-arms expiry for artifacts left on disk by an earlier process.
    /// Anything already past its retention window is deleted right away.
    pub async fn restore_expiries(&self) -> Result<RestoreReport, OrchestratorError> {
        let stored = self.store.list().await.map_err(OrchestratorError::Storage)?;
        let retention = self.config.retention;
        let now = Utc::now();
        let mut report = RestoreReport::default();

        for artifact in stored {
            let age = (now - artifact.last_modified).to_std().unwrap_or_default();
            if age >= retention {
                match self.store.delete(&artifact.id).await {
                    Ok(_) => report.purged += 1,
                    Err(e) => {
                        report.failed += 1;
                        tracing::warn!(
                            artifact_id = %artifact.id,
                            error = %e,
                            "Failed to purge stale artifact"
                        );
                    }
                }
                continue;
            }

            let restored = Artifact::restored(
                artifact.id.clone(),
                artifact.size_bytes,
                artifact.last_modified,
            );
            match self.scheduler.schedule(&restored, retention - age) {
                Ok(_) => report.rescheduled += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        artifact_id = %artifact.id,
                        error = %e,
                        "Failed to reschedule artifact expiry"
                    );
                }
            }
        }

        tracing::info!(
            purged = report.purged,
            rescheduled = report.rescheduled,
            failed = report.failed,
            "Artifact expiries restored"
        );

        Ok(report)
    }

    fn validate(&self, upload: &UploadedImage) -> Result<(), OrchestratorError> {
        if upload.is_empty() {
            return Err(OrchestratorError::BadRequest("No image provided".to_string()));
        }

        let limit = self.max_upload_bytes();
        if upload.declared_size > limit as u64 {
            return Err(OrchestratorError::Caption(CaptionError::PayloadTooLarge {
                size: upload.declared_size,
                limit,
            }));
        }

        Ok(())
    }

    fn audio_url(&self, id: &ArtifactId) -> String {
        format!(
            "{}/audio/{}",
            self.config.public_base_url.trim_end_matches('/'),
            id
        )
    }
}

async fn publish_with_expiry(
    audio_pipeline: Arc<AudioPipeline>,
    scheduler: Arc<ExpiryScheduler>,
    store: Arc<dyn ArtifactStore>,
    caption: Caption,
    artifact_id: ArtifactId,
    retention: Duration,
) -> Result<Artifact, OrchestratorError> {
    let artifact = audio_pipeline.synthesize(&caption, &artifact_id).await?;

    if let Err(e) = scheduler.schedule(&artifact, retention) {
        discard_unscheduled(store.as_ref(), artifact).await;
        return Err(OrchestratorError::Scheduling(e));
    }

    Ok(artifact)
}

async fn discard_unscheduled(store: &dyn ArtifactStore, artifact: Artifact) {
    let id = artifact.id.clone();
    match store.delete(&id).await {
        Ok(DeleteOutcome::Deleted) | Ok(DeleteOutcome::AlreadyAbsent) => {
            let state = match artifact.expire() {
                Ok(expired) => expired.state,
                Err(e) => e.from,
            };
            tracing::warn!(
                artifact_id = %id,
                %state,
                "Artifact discarded: expiry could not be scheduled"
            );
        }
        Err(e) => {
            tracing::error!(
                artifact_id = %id,
                error = %e,
                "Failed to discard unscheduled artifact"
            );
        }
    }
}

/// Client-visible error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    GenerationFailure,
    StorageError,
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Caption(#[from] CaptionError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error("expiry scheduling: {0}")]
    Scheduling(#[from] SchedulerError),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("storage: {0}")]
    Storage(#[source] ArtifactStoreError),
    #[error("narration task failed: {0}")]
    Task(String),
}

impl OrchestratorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrchestratorError::BadRequest(_) => ErrorKind::BadRequest,
            OrchestratorError::Caption(e) if e.is_input_error() => ErrorKind::BadRequest,
            OrchestratorError::Caption(_) => ErrorKind::GenerationFailure,
            OrchestratorError::Audio(AudioError::Storage(_)) => ErrorKind::StorageError,
            OrchestratorError::Audio(_) => ErrorKind::GenerationFailure,
            OrchestratorError::Scheduling(_) => ErrorKind::StorageError,
            OrchestratorError::NotFound(_) => ErrorKind::NotFound,
            OrchestratorError::Storage(_) => ErrorKind::StorageError,
            OrchestratorError::Task(_) => ErrorKind::GenerationFailure,
        }
    }
}
