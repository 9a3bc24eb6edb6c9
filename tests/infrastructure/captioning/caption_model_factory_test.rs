use narrato::application::ports::CaptionModelError;
use narrato::infrastructure::captioning::CaptionModelFactory;
use narrato::presentation::config::{CaptionProviderSetting, CaptioningSettings};

fn settings(provider: CaptionProviderSetting, api_key: Option<&str>) -> CaptioningSettings {
    CaptioningSettings {
        provider,
        model: "gpt-4o-mini".to_string(),
        base_url: "https://api.openai.com/v1".to_string(),
        api_key: api_key.map(str::to_string),
        max_caption_chars: 200,
        max_tokens: 60,
    }
}

#[tokio::test]
async fn given_mock_provider_when_creating_then_returns_working_model() {
    let model = CaptionModelFactory::create(&settings(CaptionProviderSetting::Mock, None)).unwrap();

    let caption = model.caption(b"png").await.unwrap();

    assert!(!caption.is_empty());
}

#[test]
fn given_openai_provider_without_key_when_creating_then_configuration_error() {
    let result = CaptionModelFactory::create(&settings(CaptionProviderSetting::OpenAi, None));

    assert!(matches!(result, Err(CaptionModelError::Configuration(_))));
}

#[test]
fn given_openai_provider_with_key_when_creating_then_succeeds() {
    let result =
        CaptionModelFactory::create(&settings(CaptionProviderSetting::OpenAi, Some("sk-test")));

    assert!(result.is_ok());
}
