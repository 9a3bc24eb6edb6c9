use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{SpeechSynthesizer, SynthesisError};

pub struct OpenAiSpeechSynthesizer {
    client: Client,
    base_url: String,
    model: String,
    voice: String,
    api_key: String,
}

impl OpenAiSpeechSynthesizer {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(
        base_url: &str,
        model: &str,
        voice: &str,
        api_key: &str,
    ) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SynthesisError::Configuration(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            voice: voice.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let url = format!("{}/audio/speech", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": self.voice,
            "response_format": "mp3"
        });

        tracing::debug!(
            model = %self.model,
            voice = %self.voice,
            chars = text.len(),
            "Requesting speech"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SynthesisError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::ApiRequestFailed(format!("body: {}", e)))?;

        tracing::info!(bytes = audio.len(), "Speech synthesis completed");

        Ok(audio.to_vec())
    }
}
