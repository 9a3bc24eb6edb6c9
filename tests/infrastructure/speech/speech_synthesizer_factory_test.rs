use narrato::application::ports::SynthesisError;
use narrato::infrastructure::speech::SpeechSynthesizerFactory;
use narrato::presentation::config::{SpeechProviderSetting, SpeechSettings};

fn settings(provider: SpeechProviderSetting, api_key: Option<&str>) -> SpeechSettings {
    SpeechSettings {
        provider,
        model: "tts-1".to_string(),
        voice: "alloy".to_string(),
        base_url: "https://api.openai.com/v1".to_string(),
        api_key: api_key.map(str::to_string),
    }
}

#[tokio::test]
async fn given_mock_provider_when_creating_then_returns_working_synthesizer() {
    let synthesizer =
        SpeechSynthesizerFactory::create(&settings(SpeechProviderSetting::Mock, None)).unwrap();

    let audio = synthesizer.synthesize("hi").await.unwrap();

    assert!(!audio.is_empty());
}

#[test]
fn given_openai_provider_without_key_when_creating_then_configuration_error() {
    let result = SpeechSynthesizerFactory::create(&settings(SpeechProviderSetting::OpenAi, None));

    assert!(matches!(result, Err(SynthesisError::Configuration(_))));
}
