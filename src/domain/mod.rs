mod artifact;
mod artifact_id;
mod caption;
mod uploaded_image;

pub use artifact::{Artifact, ArtifactState, InvalidTransition};
pub use artifact_id::{ArtifactId, IdStrategy, InvalidArtifactId};
pub use caption::Caption;
pub use uploaded_image::UploadedImage;
