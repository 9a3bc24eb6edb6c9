use std::time::Duration;

use narrato::domain::IdStrategy;
use narrato::presentation::Environment;
use narrato::presentation::config::{CaptionProviderSetting, Settings, SpeechProviderSetting};

#[test]
fn given_no_overrides_when_loading_then_defaults_apply() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.upload.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(settings.upload.max_image_dimension, 1024);
    assert_eq!(settings.retention(), Duration::from_secs(86_400));
    assert_eq!(settings.artifacts.id_strategy, IdStrategy::Disambiguated);
    assert_eq!(settings.workers.synthesis_workers, 2);
    assert_eq!(settings.captioning.provider, CaptionProviderSetting::Mock);
    assert_eq!(settings.speech.provider, SpeechProviderSetting::Mock);
    assert!(!settings.logging.json);
}

#[test]
fn given_default_settings_when_deriving_component_configs_then_values_flow_through() {
    let settings = Settings::load(Environment::Test).unwrap();

    let pipeline = settings.caption_pipeline_config();
    let orchestrator = settings.orchestrator_config();

    assert_eq!(pipeline.max_upload_bytes, settings.upload.max_upload_bytes);
    assert_eq!(pipeline.max_caption_chars, 200);
    assert_eq!(orchestrator.retention, settings.retention());
    assert_eq!(orchestrator.public_base_url, "");
    assert_eq!(settings.socket_addr().unwrap().port(), 8000);
    assert_eq!(settings.storage_dir(), std::path::PathBuf::from("audio"));
}

#[test]
fn given_production_environment_when_loading_then_json_logging_defaults_on() {
    let settings = Settings::load(Environment::Production).unwrap();
    let tracing = settings.tracing_config(Environment::Production);

    assert!(settings.logging.json);
    assert!(tracing.json_format);
    assert_eq!(tracing.environment, "production");
}
