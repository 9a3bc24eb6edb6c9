use std::path::PathBuf;
use std::sync::Arc;

use futures::TryStreamExt;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, DeleteOutcome, StoredArtifact,
};
use crate::domain::{Artifact, ArtifactId};

/// Audio artifacts as `<id>.mp3` files in one directory. The directory is
/// the only index: every call goes to the filesystem.
pub struct LocalArtifactStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(base_path: PathBuf) -> Result<Self, ArtifactStoreError> {
        std::fs::create_dir_all(&base_path).map_err(ArtifactStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;
        tracing::info!(path = %base_path.display(), "Artifact store initialized");
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    fn location(id: &ArtifactId) -> StorePath {
        StorePath::from(id.object_name())
    }
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn put(&self, id: &ArtifactId, bytes: &[u8]) -> Result<Artifact, ArtifactStoreError> {
        let artifact = Artifact::pending(id.clone());

        // LocalFileSystem stages the write in a temporary file and renames it
        // into place, so readers never observe a partial artifact.
        self.inner
            .put(&Self::location(id), PutPayload::from(bytes.to_vec()))
            .await
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;

        artifact
            .publish(bytes.len() as u64)
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))
    }

    async fn get(&self, id: &ArtifactId) -> Result<Vec<u8>, ArtifactStoreError> {
        let result = match self.inner.get(&Self::location(id)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(ArtifactStoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(ArtifactStoreError::ReadFailed(e.to_string())),
        };

        let bytes = result.bytes().await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => ArtifactStoreError::NotFound(id.to_string()),
            other => ArtifactStoreError::ReadFailed(other.to_string()),
        })?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, id: &ArtifactId) -> Result<DeleteOutcome, ArtifactStoreError> {
        match self.inner.delete(&Self::location(id)).await {
            Ok(()) => Ok(DeleteOutcome::Deleted),
            Err(object_store::Error::NotFound { .. }) => Ok(DeleteOutcome::AlreadyAbsent),
            Err(e) => Err(ArtifactStoreError::DeleteFailed(e.to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<StoredArtifact>, ArtifactStoreError> {
        let metas: Vec<_> = self
            .inner
            .list(None)
            .try_collect()
            .await
            .map_err(|e| ArtifactStoreError::ReadFailed(e.to_string()))?;

        let artifacts = metas
            .into_iter()
            .filter_map(|meta| {
                let id = meta.location.filename().and_then(ArtifactId::from_object_name)?;
                Some(StoredArtifact {
                    id,
                    size_bytes: meta.size,
                    last_modified: meta.last_modified,
                })
            })
            .collect();

        Ok(artifacts)
    }
}
