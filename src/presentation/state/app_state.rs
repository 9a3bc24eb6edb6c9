use std::sync::Arc;

use crate::application::services::RequestOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<RequestOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<RequestOrchestrator>) -> Self {
        Self { orchestrator }
    }
}
