mod audio_pipeline;
mod caption_pipeline;
mod expiry_scheduler;
mod request_orchestrator;

pub use audio_pipeline::{AudioError, AudioPipeline};
pub use caption_pipeline::{CaptionError, CaptionPipeline, CaptionPipelineConfig};
pub use expiry_scheduler::{ExpiryScheduler, ExpiryTaskId, SchedulerError, TaskHandle};
pub use request_orchestrator::{
    ErrorKind, NarrationResult, OrchestratorConfig, OrchestratorError, RequestOrchestrator,
    RequestStage, RestoreReport,
};
