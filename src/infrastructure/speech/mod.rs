mod mock_speech_synthesizer;
mod openai_speech_synthesizer;
mod speech_synthesizer_factory;

pub use mock_speech_synthesizer::MockSpeechSynthesizer;
pub use openai_speech_synthesizer::OpenAiSpeechSynthesizer;
pub use speech_synthesizer_factory::SpeechSynthesizerFactory;
