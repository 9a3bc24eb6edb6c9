use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use narrato::application::ports::ArtifactStore;
use narrato::application::services::{
    AudioPipeline, CaptionPipeline, ExpiryScheduler, RequestOrchestrator,
};
use narrato::infrastructure::captioning::CaptionModelFactory;
use narrato::infrastructure::observability::init_tracing;
use narrato::infrastructure::speech::SpeechSynthesizerFactory;
use narrato::infrastructure::storage::LocalArtifactStore;
use narrato::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;
    let addr = settings.socket_addr().context("Invalid server address")?;

    init_tracing(&settings.tracing_config(environment), addr);

    let store: Arc<dyn ArtifactStore> = Arc::new(
        LocalArtifactStore::new(settings.storage_dir())
            .context("Failed to open artifact storage")?,
    );

    let caption_model = CaptionModelFactory::create(&settings.captioning)
        .context("Failed to build caption model")?;
    let synthesizer = SpeechSynthesizerFactory::create(&settings.speech)
        .context("Failed to build speech synthesizer")?;

    let caption_pipeline = Arc::new(CaptionPipeline::new(
        caption_model,
        settings.caption_pipeline_config(),
    ));
    let audio_pipeline = Arc::new(AudioPipeline::new(
        synthesizer,
        Arc::clone(&store),
        settings.workers.synthesis_workers,
    ));
    let scheduler = Arc::new(ExpiryScheduler::new(Arc::clone(&store)));

    let orchestrator = Arc::new(RequestOrchestrator::new(
        caption_pipeline,
        audio_pipeline,
        Arc::clone(&scheduler),
        store,
        settings.orchestrator_config(),
    ));

    orchestrator
        .restore_expiries()
        .await
        .context("Failed to restore artifact expiries")?;

    let router = create_router(AppState::new(orchestrator));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        storage_dir = %settings.artifacts.storage_dir,
        retention_secs = settings.artifacts.retention_secs,
        "Listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let cancelled = scheduler.cancel_all();
    tracing::info!(cancelled, "Server stopped, pending expiries cancelled");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
