use std::io;

use chrono::{DateTime, Utc};

use crate::domain::{Artifact, ArtifactId};

#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Writes `bytes` under `id`, replacing any previous content.
    async fn put(&self, id: &ArtifactId, bytes: &[u8]) -> Result<Artifact, ArtifactStoreError>;

    async fn get(&self, id: &ArtifactId) -> Result<Vec<u8>, ArtifactStoreError>;

    async fn delete(&self, id: &ArtifactId) -> Result<DeleteOutcome, ArtifactStoreError>;

    async fn list(&self) -> Result<Vec<StoredArtifact>, ArtifactStoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyAbsent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredArtifact {
    pub id: ArtifactId,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
