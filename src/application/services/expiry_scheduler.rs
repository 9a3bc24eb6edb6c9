use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::AbortHandle;

use crate::application::ports::{ArtifactStore, DeleteOutcome};
use crate::domain::{Artifact, ArtifactId, ArtifactState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpiryTaskId(u64);

impl ExpiryTaskId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct TaskHandle {
    pub task_id: ExpiryTaskId,
    pub artifact_id: ArtifactId,
    pub deadline: DateTime<Utc>,
}

struct LiveTask {
    artifact_id: ArtifactId,
    abort: AbortHandle,
}

#[derive(Default)]
struct Registry {
    next_task_id: u64,
    live: HashMap<ExpiryTaskId, LiveTask>,
    closed: bool,
}

/// Deletes each artifact once its retention window has elapsed.
///
/// Every scheduled deletion is a timer task tracked in a registry. A task only
/// deletes if it can still remove its own registry entry when it wakes, so a
/// cancelled task never touches the store even if its timer already fired.
pub struct ExpiryScheduler {
    store: Arc<dyn ArtifactStore>,
    registry: Arc<Mutex<Registry>>,
}

impl ExpiryScheduler {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            store,
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// Must be called from within a tokio runtime. Only published artifacts
    /// can be scheduled.
    pub fn schedule(
        &self,
        artifact: &Artifact,
        retention: Duration,
    ) -> Result<TaskHandle, SchedulerError> {
        if !artifact.is_readable() {
            return Err(SchedulerError::NotPublished(artifact.state));
        }

        let artifact_id = artifact.id.clone();
        let mut registry = lock(&self.registry);
        if registry.closed {
            return Err(SchedulerError::Closed);
        }

        let task_id = ExpiryTaskId(registry.next_task_id);
        registry.next_task_id += 1;

        let deadline = chrono::Duration::from_std(retention)
            .ok()
            .and_then(|retention| Utc::now().checked_add_signed(retention))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        // The registry lock is held until the entry is inserted, so the task
        // cannot look for its entry before it exists.
        let join = tokio::spawn(run_expiry(
            task_id,
            artifact.clone(),
            retention,
            Arc::clone(&self.store),
            Arc::clone(&self.registry),
        ));

        registry.live.insert(
            task_id,
            LiveTask {
                artifact_id: artifact_id.clone(),
                abort: join.abort_handle(),
            },
        );

        tracing::debug!(
            task_id = task_id.0,
            artifact_id = %artifact_id,
            retention_secs = retention.as_secs(),
            "Expiry scheduled"
        );

        Ok(TaskHandle {
            task_id,
            artifact_id,
            deadline,
        })
    }

    pub fn cancel(&self, handle: &TaskHandle) -> bool {
        let removed = lock(&self.registry).live.remove(&handle.task_id);
        match removed {
            Some(task) => {
                task.abort.abort();
                tracing::debug!(
                    task_id = handle.task_id.0,
                    artifact_id = %task.artifact_id,
                    "Expiry cancelled"
                );
                true
            }
            None => false,
        }
    }

    /// Cancels every pending deletion and refuses new ones. Deletions that
    /// already ran are not undone.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<LiveTask> = {
            let mut registry = lock(&self.registry);
            registry.closed = true;
            registry.live.drain().map(|(_, task)| task).collect()
        };

        for task in &drained {
            task.abort.abort();
        }

        tracing::info!(cancelled = drained.len(), "Expiry scheduler shut down");
        drained.len()
    }

    pub fn pending(&self) -> usize {
        lock(&self.registry).live.len()
    }

    pub fn pending_for(&self, artifact_id: &ArtifactId) -> usize {
        lock(&self.registry)
            .live
            .values()
            .filter(|task| &task.artifact_id == artifact_id)
            .count()
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.registry).closed
    }
}

async fn run_expiry(
    task_id: ExpiryTaskId,
    artifact: Artifact,
    retention: Duration,
    store: Arc<dyn ArtifactStore>,
    registry: Arc<Mutex<Registry>>,
) {
    tokio::time::sleep(retention).await;

    let claimed = lock(&registry).live.remove(&task_id).is_some();
    if !claimed {
        return;
    }

    let artifact_id = artifact.id.clone();
    match store.delete(&artifact_id).await {
        Ok(DeleteOutcome::Deleted) => match artifact.expire() {
            Ok(expired) => tracing::info!(
                task_id = task_id.0,
                artifact_id = %expired.id,
                state = %expired.state,
                "Expired artifact deleted"
            ),
            Err(e) => tracing::warn!(
                task_id = task_id.0,
                artifact_id = %artifact_id,
                error = %e,
                "Expired artifact deleted from unexpected state"
            ),
        },
        Ok(DeleteOutcome::AlreadyAbsent) => {
            tracing::debug!(
                task_id = task_id.0,
                artifact_id = %artifact_id,
                "Expired artifact already gone"
            );
        }
        Err(e) => {
            tracing::error!(
                task_id = task_id.0,
                artifact_id = %artifact_id,
                error = %e,
                "Failed to delete expired artifact"
            );
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("expiry scheduler is shut down")]
    Closed,
    #[error("artifact is {0}, only available artifacts expire")]
    NotPublished(ArtifactState),
}
