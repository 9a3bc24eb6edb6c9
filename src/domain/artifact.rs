use std::fmt;

use chrono::{DateTime, Utc};

use super::ArtifactId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactState {
    Pending,
    Available,
    Deleted,
}

impl ArtifactState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactState::Pending => "PENDING",
            ArtifactState::Available => "AVAILABLE",
            ArtifactState::Deleted => "DELETED",
        }
    }

    pub fn can_transition_to(&self, next: ArtifactState) -> bool {
        matches!(
            (self, next),
            (ArtifactState::Pending, ArtifactState::Available)
                | (ArtifactState::Available, ArtifactState::Deleted)
        )
    }
}

impl fmt::Display for ArtifactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub id: ArtifactId,
    pub location: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub state: ArtifactState,
}

impl Artifact {
    pub fn pending(id: ArtifactId) -> Self {
        let location = id.object_name();
        Self {
            id,
            location,
            size_bytes: 0,
            created_at: Utc::now(),
            state: ArtifactState::Pending,
        }
    }

    /// An artifact found in the store at startup. It was published by an
    /// earlier process, so it starts out Available.
    pub fn restored(id: ArtifactId, size_bytes: u64, created_at: DateTime<Utc>) -> Self {
        let location = id.object_name();
        Self {
            id,
            location,
            size_bytes,
            created_at,
            state: ArtifactState::Available,
        }
    }

    /// Pending -> Available, once the audio bytes are durably written.
    pub fn publish(mut self, size_bytes: u64) -> Result<Self, InvalidTransition> {
        self.transition(ArtifactState::Available)?;
        self.size_bytes = size_bytes;
        self.created_at = Utc::now();
        Ok(self)
    }

    /// Available -> Deleted.
    pub fn expire(mut self) -> Result<Self, InvalidTransition> {
        self.transition(ArtifactState::Deleted)?;
        Ok(self)
    }

    pub fn is_readable(&self) -> bool {
        self.state == ArtifactState::Available
    }

    fn transition(&mut self, next: ArtifactState) -> Result<(), InvalidTransition> {
        if !self.state.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid artifact transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: ArtifactState,
    pub to: ArtifactState,
}
