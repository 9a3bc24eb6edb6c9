use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, SpeechSynthesizer, SynthesisError,
};
use crate::domain::{Artifact, ArtifactId, Caption};

/// Caption -> published audio artifact. Synthesis runs on a fixed number of
/// worker permits; callers beyond that wait in arrival order.
pub struct AudioPipeline {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: Arc<dyn ArtifactStore>,
    workers: Arc<Semaphore>,
}

impl AudioPipeline {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: Arc<dyn ArtifactStore>,
        worker_count: usize,
    ) -> Self {
        Self {
            synthesizer,
            store,
            workers: Arc::new(Semaphore::new(worker_count.max(1))),
        }
    }

    pub fn idle_workers(&self) -> usize {
        self.workers.available_permits()
    }

    #[tracing::instrument(skip(self, caption), fields(artifact_id = %id))]
    pub async fn synthesize(
        &self,
        caption: &Caption,
        id: &ArtifactId,
    ) -> Result<Artifact, AudioError> {
        let audio = {
            let _permit = self
                .workers
                .acquire()
                .await
                .map_err(|_| AudioError::PoolClosed)?;

            self.synthesizer
                .synthesize(caption.as_str())
                .await
                .map_err(AudioError::GenerationFailed)?
        };

        if audio.is_empty() {
            return Err(AudioError::EmptyAudio);
        }

        let artifact = self
            .store
            .put(id, &audio)
            .await
            .map_err(AudioError::Storage)?;

        tracing::debug!(
            size_bytes = artifact.size_bytes,
            location = %artifact.location,
            "Audio artifact published"
        );

        Ok(artifact)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio generation failed: {0}")]
    GenerationFailed(#[source] SynthesisError),
    #[error("audio generation returned no data")]
    EmptyAudio,
    #[error("synthesis worker pool closed")]
    PoolClosed,
    #[error("storage: {0}")]
    Storage(#[source] ArtifactStoreError),
}
