mod audio;
mod caption;
mod error;
mod health;

pub use audio::{AUDIO_CONTENT_TYPE, audio_handler};
pub use caption::{CaptionResponse, caption_handler};
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
