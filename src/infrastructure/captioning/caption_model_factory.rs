use std::sync::Arc;

use crate::application::ports::{CaptionModel, CaptionModelError};
use crate::presentation::config::{CaptionProviderSetting, CaptioningSettings};

use super::mock_caption_model::MockCaptionModel;
use super::openai_vision_captioner::OpenAiVisionCaptioner;

pub struct CaptionModelFactory;

impl CaptionModelFactory {
    pub fn create(
        settings: &CaptioningSettings,
    ) -> Result<Arc<dyn CaptionModel>, CaptionModelError> {
        match settings.provider {
            CaptionProviderSetting::Mock => Ok(Arc::new(MockCaptionModel::default())),
            CaptionProviderSetting::OpenAi => {
                let key = settings.api_key.as_deref().ok_or_else(|| {
                    CaptionModelError::Configuration("captioning.api_key required".into())
                })?;
                let captioner = OpenAiVisionCaptioner::new(
                    &settings.base_url,
                    &settings.model,
                    key,
                    settings.max_tokens,
                )?;
                Ok(Arc::new(captioner))
            }
        }
    }
}
