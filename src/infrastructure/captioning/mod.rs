mod caption_model_factory;
mod mock_caption_model;
mod openai_vision_captioner;

pub use caption_model_factory::CaptionModelFactory;
pub use mock_caption_model::MockCaptionModel;
pub use openai_vision_captioner::{CAPTION_PROMPT, OpenAiVisionCaptioner};
