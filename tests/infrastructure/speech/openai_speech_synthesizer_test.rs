use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use narrato::application::ports::{SpeechSynthesizer, SynthesisError};
use narrato::infrastructure::speech::{MockSpeechSynthesizer, OpenAiSpeechSynthesizer};

type Captured = Arc<Mutex<Option<Value>>>;

async fn start_mock_speech_server(
    response_status: u16,
    response_body: &'static [u8],
) -> (String, Captured, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let captured: Captured = Arc::new(Mutex::new(None));

    let app = Router::new()
        .route(
            "/v1/audio/speech",
            post(
                move |State(captured): State<Captured>, axum::Json(body): axum::Json<Value>| async move {
                    *captured.lock().unwrap() = Some(body);
                    let status = StatusCode::from_u16(response_status).unwrap();
                    (status, response_body).into_response()
                },
            ),
        )
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}/v1/", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, captured, shutdown_tx)
}

#[tokio::test]
async fn given_successful_response_when_synthesizing_then_returns_audio_bytes() {
    let (base_url, captured, shutdown_tx) =
        start_mock_speech_server(200, b"\xFF\xFB\x90\x64audio").await;

    let synthesizer = OpenAiSpeechSynthesizer::new(&base_url, "tts-1", "alloy", "sk-test").unwrap();
    let audio = synthesizer.synthesize("a cat on a mat").await.unwrap();

    assert_eq!(audio, b"\xFF\xFB\x90\x64audio");
    let request = captured.lock().unwrap().clone().unwrap();
    assert_eq!(request["model"], "tts-1");
    assert_eq!(request["voice"], "alloy");
    assert_eq!(request["input"], "a cat on a mat");
    assert_eq!(request["response_format"], "mp3");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_error_status_when_synthesizing_then_returns_api_request_failed() {
    let (base_url, _captured, shutdown_tx) =
        start_mock_speech_server(429, b"rate limited").await;

    let synthesizer = OpenAiSpeechSynthesizer::new(&base_url, "tts-1", "alloy", "k").unwrap();
    let result = synthesizer.synthesize("hello").await;

    match result {
        Err(SynthesisError::ApiRequestFailed(message)) => {
            assert!(message.contains("429"));
            assert!(message.contains("rate limited"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_text_when_mock_synthesizes_then_output_is_deterministic_mp3_frame() {
    let first = MockSpeechSynthesizer.synthesize("hello").await.unwrap();
    let second = MockSpeechSynthesizer.synthesize("hello").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(&first[..4], &[0xFF, 0xFB, 0x90, 0x64]);
    assert!(first.ends_with(b"hello"));
}
