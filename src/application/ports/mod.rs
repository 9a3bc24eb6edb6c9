mod artifact_store;
mod caption_model;
mod speech_synthesizer;

pub use artifact_store::{ArtifactStore, ArtifactStoreError, DeleteOutcome, StoredArtifact};
pub use caption_model::{CaptionModel, CaptionModelError};
pub use speech_synthesizer::{SpeechSynthesizer, SynthesisError};
