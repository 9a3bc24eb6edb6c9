use std::sync::Arc;

use crate::application::ports::{SpeechSynthesizer, SynthesisError};
use crate::presentation::config::{SpeechProviderSetting, SpeechSettings};

use super::mock_speech_synthesizer::MockSpeechSynthesizer;
use super::openai_speech_synthesizer::OpenAiSpeechSynthesizer;

pub struct SpeechSynthesizerFactory;

impl SpeechSynthesizerFactory {
    pub fn create(settings: &SpeechSettings) -> Result<Arc<dyn SpeechSynthesizer>, SynthesisError> {
        match settings.provider {
            SpeechProviderSetting::Mock => Ok(Arc::new(MockSpeechSynthesizer)),
            SpeechProviderSetting::OpenAi => {
                let key = settings.api_key.as_deref().ok_or_else(|| {
                    SynthesisError::Configuration("speech.api_key required".into())
                })?;
                let synthesizer = OpenAiSpeechSynthesizer::new(
                    &settings.base_url,
                    &settings.model,
                    &settings.voice,
                    key,
                )?;
                Ok(Arc::new(synthesizer))
            }
        }
    }
}
