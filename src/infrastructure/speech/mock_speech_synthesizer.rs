use crate::application::ports::{SpeechSynthesizer, SynthesisError};

/// Minimal MPEG-1 Layer III frame header (128 kbps, 44.1 kHz).
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];

/// Returns an MP3 frame header followed by the UTF-8 text, so the output is
/// deterministic and differs per caption.
pub struct MockSpeechSynthesizer;

#[async_trait::async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let mut audio = Vec::with_capacity(MP3_FRAME_HEADER.len() + text.len());
        audio.extend_from_slice(&MP3_FRAME_HEADER);
        audio.extend_from_slice(text.as_bytes());
        Ok(audio)
    }
}
