use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{CaptionModel, CaptionModelError};

pub const CAPTION_PROMPT: &str = "Describe this image in one short, plain sentence suitable \
for being read aloud. Do not add any preamble.";

/// Captions through any OpenAI-compatible chat completions endpoint that
/// accepts `image_url` content parts.
pub struct OpenAiVisionCaptioner {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl OpenAiVisionCaptioner {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        max_tokens: u32,
    ) -> Result<Self, CaptionModelError> {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CaptionModelError::Configuration(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            max_tokens,
        })
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl CaptionModel for OpenAiVisionCaptioner {
    async fn caption(&self, png_bytes: &[u8]) -> Result<String, CaptionModelError> {
        let b64 = general_purpose::STANDARD.encode(png_bytes);
        let data_uri = format!("data:image/png;base64,{b64}");

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "image_url",
                            "image_url": { "url": data_uri }
                        },
                        {
                            "type": "text",
                            "text": CAPTION_PROMPT
                        }
                    ]
                }
            ],
            "max_tokens": self.max_tokens,
            "temperature": 0.0,
            "stream": false
        });

        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(
            model = %self.model,
            image_bytes = png_bytes.len(),
            "Requesting caption"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CaptionModelError::ApiRequestFailed(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CaptionModelError::ApiRequestFailed(format!(
                "status {status}: {text}"
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| CaptionModelError::ApiRequestFailed(format!("parse response: {e}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        tracing::info!(chars = content.len(), "Caption model responded");

        Ok(content.trim().to_string())
    }
}
