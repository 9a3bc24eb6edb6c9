use crate::application::ports::{CaptionModel, CaptionModelError};

pub struct MockCaptionModel {
    caption: String,
}

impl MockCaptionModel {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
        }
    }
}

impl Default for MockCaptionModel {
    fn default() -> Self {
        Self::new("a placeholder description of the uploaded picture")
    }
}

#[async_trait::async_trait]
impl CaptionModel for MockCaptionModel {
    async fn caption(&self, _png_bytes: &[u8]) -> Result<String, CaptionModelError> {
        Ok(self.caption.clone())
    }
}
