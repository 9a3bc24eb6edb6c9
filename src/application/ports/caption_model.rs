use async_trait::async_trait;

/// Image -> short text. Receives a PNG that has already been validated and downscaled.
#[async_trait]
pub trait CaptionModel: Send + Sync {
    async fn caption(&self, png_bytes: &[u8]) -> Result<String, CaptionModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CaptionModelError {
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("model configuration: {0}")]
    Configuration(String),
}
