use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Limits};

use crate::application::ports::{CaptionModel, CaptionModelError};
use crate::domain::Caption;

const MAX_DECODE_SIDE: u32 = 16_384;
const MAX_DECODE_ALLOC: u64 = 512 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct CaptionPipelineConfig {
    pub max_upload_bytes: usize,
    pub max_image_dimension: u32,
    pub max_caption_chars: usize,
}

pub struct CaptionPipeline {
    model: Arc<dyn CaptionModel>,
    config: CaptionPipelineConfig,
}

impl CaptionPipeline {
    pub fn new(model: Arc<dyn CaptionModel>, config: CaptionPipelineConfig) -> Self {
        Self { model, config }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.config.max_upload_bytes
    }

    #[tracing::instrument(skip(self, image_bytes), fields(bytes = image_bytes.len()))]
    pub async fn caption(&self, image_bytes: Bytes) -> Result<Caption, CaptionError> {
        if image_bytes.len() > self.config.max_upload_bytes {
            return Err(CaptionError::PayloadTooLarge {
                size: image_bytes.len() as u64,
                limit: self.config.max_upload_bytes,
            });
        }

        let max_dimension = self.config.max_image_dimension;
        let png = tokio::task::spawn_blocking(move || prepare_image(&image_bytes, max_dimension))
            .await
            .map_err(CaptionError::from)??;

        let raw = self
            .model
            .caption(&png)
            .await
            .map_err(CaptionError::GenerationFailed)?;

        let caption = Caption::normalize(&raw, self.config.max_caption_chars)
            .ok_or(CaptionError::EmptyCaption)?;

        tracing::debug!(chars = caption.as_str().len(), "Caption generated");

        Ok(caption)
    }
}

/// Decodes, verifies and downscales the upload, returning PNG bytes for the model.
fn prepare_image(data: &[u8], max_dimension: u32) -> Result<Vec<u8>, CaptionError> {
    let format = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CaptionError::InvalidImage(format!("unreadable upload: {e}")))?
        .format()
        .ok_or_else(|| CaptionError::InvalidImage("unrecognized image format".to_string()))?;

    let (width, height) = ImageReader::with_format(Cursor::new(data), format)
        .into_dimensions()
        .map_err(|e| CaptionError::InvalidImage(format!("header: {e}")))?;

    if width == 0 || height == 0 {
        return Err(CaptionError::InvalidImage(
            "image has no pixels".to_string(),
        ));
    }

    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DECODE_SIDE);
    limits.max_image_height = Some(MAX_DECODE_SIDE);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);

    let mut reader = ImageReader::with_format(Cursor::new(data), format);
    reader.limits(limits);
    let image = reader
        .decode()
        .map_err(|e| CaptionError::InvalidImage(format!("decode: {e}")))?;

    let normalized = downscale(image, max_dimension);

    let mut png = Vec::new();
    normalized
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| CaptionError::Preprocessing(format!("png encode: {e}")))?;

    tracing::debug!(
        original_width = width,
        original_height = height,
        width = normalized.width(),
        height = normalized.height(),
        "Image normalized"
    );

    Ok(png)
}

fn downscale(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    if image.width() <= max_dimension && image.height() <= max_dimension {
        return image;
    }
    image.resize(max_dimension, max_dimension, FilterType::Triangle)
}

#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("image of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: usize },
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("image preprocessing failed: {0}")]
    Preprocessing(String),
    #[error("caption generation failed: {0}")]
    GenerationFailed(#[source] CaptionModelError),
    #[error("caption generation returned no text")]
    EmptyCaption,
}

impl CaptionError {
    /// True for problems the caller can fix by sending a different upload.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CaptionError::PayloadTooLarge { .. } | CaptionError::InvalidImage(_)
        )
    }
}

/// A decoder that panics was handed bytes it could not cope with, so the
/// upload is reported as invalid.
impl From<tokio::task::JoinError> for CaptionError {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_panic() {
            CaptionError::InvalidImage("image decoder rejected the upload".to_string())
        } else {
            CaptionError::Preprocessing(format!("task join error: {e}"))
        }
    }
}
