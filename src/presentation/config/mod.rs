mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ArtifactSettings, CaptionProviderSetting, CaptioningSettings, LoggingSettings,
    ServerSettings, Settings, SpeechProviderSetting, SpeechSettings, UploadSettings,
    WorkerSettings,
};
