use std::sync::{Arc, Mutex};

use bytes::Bytes;

use narrato::application::ports::{CaptionModel, CaptionModelError};
use narrato::application::services::{CaptionError, CaptionPipeline, CaptionPipelineConfig};

use crate::helpers::{CountingCaptionModel, TEST_CAPTION, jpeg_bytes, pipeline_config, png_bytes};

struct CapturingModel {
    seen: Mutex<Vec<Vec<u8>>>,
}

#[async_trait::async_trait]
impl CaptionModel for CapturingModel {
    async fn caption(&self, png_bytes: &[u8]) -> Result<String, CaptionModelError> {
        self.seen.lock().unwrap().push(png_bytes.to_vec());
        Ok(TEST_CAPTION.to_string())
    }
}

fn pipeline_with(model: Arc<CountingCaptionModel>) -> CaptionPipeline {
    CaptionPipeline::new(model, pipeline_config())
}

#[tokio::test]
async fn given_valid_png_when_captioning_then_returns_normalized_caption() {
    let model = Arc::new(CountingCaptionModel::replying("  a red\n square  "));
    let pipeline = pipeline_with(model.clone());

    let caption = pipeline.caption(Bytes::from(png_bytes(32, 32))).await.unwrap();

    assert_eq!(caption.as_str(), "a red square");
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn given_upload_over_limit_when_captioning_then_payload_too_large_without_model_call() {
    let model = Arc::new(CountingCaptionModel::replying(TEST_CAPTION));
    let pipeline = CaptionPipeline::new(
        model.clone(),
        CaptionPipelineConfig {
            max_upload_bytes: 100,
            ..pipeline_config()
        },
    );

    let err = pipeline
        .caption(Bytes::from(vec![0u8; 101]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CaptionError::PayloadTooLarge {
            size: 101,
            limit: 100
        }
    ));
    assert!(err.is_input_error());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn given_text_file_when_captioning_then_invalid_image_without_model_call() {
    let model = Arc::new(CountingCaptionModel::replying(TEST_CAPTION));
    let pipeline = pipeline_with(model.clone());

    let err = pipeline
        .caption(Bytes::from_static(b"this is just a text file renamed to png"))
        .await
        .unwrap_err();

    assert!(matches!(err, CaptionError::InvalidImage(_)));
    assert!(err.is_input_error());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn given_truncated_png_when_captioning_then_invalid_image() {
    let model = Arc::new(CountingCaptionModel::replying(TEST_CAPTION));
    let pipeline = pipeline_with(model.clone());
    let mut png = png_bytes(64, 64);
    png.truncate(png.len() / 2);

    let err = pipeline.caption(Bytes::from(png)).await.unwrap_err();

    assert!(matches!(err, CaptionError::InvalidImage(_)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn given_large_jpeg_when_captioning_then_model_receives_downscaled_png() {
    let model = Arc::new(CapturingModel {
        seen: Mutex::new(Vec::new()),
    });
    let pipeline = CaptionPipeline::new(model.clone(), pipeline_config());

    pipeline
        .caption(Bytes::from(jpeg_bytes(2000, 1000)))
        .await
        .unwrap();

    let seen = model.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let decoded = image::load_from_memory_with_format(&seen[0], image::ImageFormat::Png).unwrap();
    assert_eq!(decoded.width(), 512);
    assert_eq!(decoded.height(), 256);
}

#[tokio::test]
async fn given_small_image_when_captioning_then_dimensions_are_kept() {
    let model = Arc::new(CapturingModel {
        seen: Mutex::new(Vec::new()),
    });
    let pipeline = CaptionPipeline::new(model.clone(), pipeline_config());

    pipeline.caption(Bytes::from(png_bytes(40, 30))).await.unwrap();

    let seen = model.seen.lock().unwrap();
    let decoded = image::load_from_memory(&seen[0]).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (40, 30));
}

#[tokio::test]
async fn given_model_failure_when_captioning_then_generation_failed() {
    let model = Arc::new(CountingCaptionModel::failing("model offline"));
    let pipeline = pipeline_with(model.clone());

    let err = pipeline.caption(Bytes::from(png_bytes(16, 16))).await.unwrap_err();

    assert!(matches!(err, CaptionError::GenerationFailed(_)));
    assert!(!err.is_input_error());
}

#[tokio::test]
async fn given_blank_model_output_when_captioning_then_empty_caption() {
    let model = Arc::new(CountingCaptionModel::replying("   \n "));
    let pipeline = pipeline_with(model);

    let err = pipeline.caption(Bytes::from(png_bytes(16, 16))).await.unwrap_err();

    assert!(matches!(err, CaptionError::EmptyCaption));
}

#[tokio::test]
async fn given_decoder_panic_when_join_fails_then_reported_as_invalid_image() {
    let join_error = tokio::task::spawn_blocking(|| -> Vec<u8> { panic!("corrupt scanline") })
        .await
        .unwrap_err();

    let err = CaptionError::from(join_error);

    assert!(matches!(err, CaptionError::InvalidImage(_)));
    assert!(err.is_input_error());
}

#[tokio::test]
async fn given_cancelled_preprocessing_when_join_fails_then_preprocessing_error() {
    let handle = tokio::spawn(async {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
    });
    handle.abort();
    let join_error = handle.await.unwrap_err();

    let err = CaptionError::from(join_error);

    assert!(matches!(err, CaptionError::Preprocessing(_)));
    assert!(!err.is_input_error());
}
