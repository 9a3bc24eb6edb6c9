use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use crate::application::services::{CaptionPipelineConfig, OrchestratorConfig};
use crate::domain::IdStrategy;
use crate::infrastructure::observability::TracingConfig;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub upload: UploadSettings,
    pub artifacts: ArtifactSettings,
    pub workers: WorkerSettings,
    pub captioning: CaptioningSettings,
    pub speech: SpeechSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub max_upload_bytes: usize,
    pub max_image_dimension: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSettings {
    pub storage_dir: String,
    pub retention_secs: u64,
    pub public_base_url: String,
    pub id_strategy: IdStrategy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    pub synthesis_workers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionProviderSetting {
    Mock,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptioningSettings {
    pub provider: CaptionProviderSetting,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_caption_chars: usize,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProviderSetting {
    Mock,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    pub provider: SpeechProviderSetting,
    pub model: String,
    pub voice: String,
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub json: bool,
}

impl Settings {
    /// Defaults, then `appsettings.<environment>` if present, then `APP_*`
    /// variables (`APP_ARTIFACTS__RETENTION_SECS=3600`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("upload.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("upload.max_image_dimension", 1024)?
            .set_default("artifacts.storage_dir", "audio")?
            .set_default("artifacts.retention_secs", 24 * 60 * 60)?
            .set_default("artifacts.public_base_url", "")?
            .set_default("artifacts.id_strategy", "disambiguated")?
            .set_default("workers.synthesis_workers", 2)?
            .set_default("captioning.provider", "mock")?
            .set_default("captioning.model", "gpt-4o-mini")?
            .set_default("captioning.base_url", "https://api.openai.com/v1")?
            .set_default("captioning.max_caption_chars", 200)?
            .set_default("captioning.max_tokens", 60)?
            .set_default("speech.provider", "mock")?
            .set_default("speech.model", "tts-1")?
            .set_default("speech.voice", "alloy")?
            .set_default("speech.base_url", "https://api.openai.com/v1")?
            .set_default("logging.json", environment.prefers_json_logs())?
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    pub fn storage_dir(&self) -> PathBuf {
        PathBuf::from(&self.artifacts.storage_dir)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.artifacts.retention_secs)
    }

    pub fn caption_pipeline_config(&self) -> CaptionPipelineConfig {
        CaptionPipelineConfig {
            max_upload_bytes: self.upload.max_upload_bytes,
            max_image_dimension: self.upload.max_image_dimension,
            max_caption_chars: self.captioning.max_caption_chars,
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            retention: self.retention(),
            public_base_url: self.artifacts.public_base_url.clone(),
            id_strategy: self.artifacts.id_strategy,
        }
    }

    pub fn tracing_config(&self, environment: Environment) -> TracingConfig {
        TracingConfig::new(environment.as_str(), self.logging.json)
    }
}
