use async_trait::async_trait;

/// Text -> MP3 bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("synthesis failed: {0}")]
    SynthesisFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("synthesizer configuration: {0}")]
    Configuration(String),
}
