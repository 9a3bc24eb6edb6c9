use std::fmt;

use serde::Deserialize;
use uuid::Uuid;

const MAX_STEM_LEN: usize = 64;
const MAX_ID_LEN: usize = 128;
const TOKEN_LEN: usize = 16;
const FALLBACK_STEM: &str = "upload";

/// How an artifact id is derived from the client-supplied file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Normalized file name only. Uploads sharing a name overwrite each other.
    Filename,
    /// Normalized file name plus a random token.
    #[default]
    Disambiguated,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn from_filename(filename: Option<&str>, strategy: IdStrategy) -> Self {
        let stem = normalize_stem(filename.unwrap_or_default());
        match strategy {
            IdStrategy::Filename => Self(stem),
            IdStrategy::Disambiguated => {
                let token = Uuid::new_v4().simple().to_string();
                Self(format!("{}-{}", stem, &token[..TOKEN_LEN]))
            }
        }
    }

    /// Parses an id received from a client. Rejects anything that could not
    /// have been produced by [`ArtifactId::from_filename`].
    pub fn parse(raw: &str) -> Result<Self, InvalidArtifactId> {
        if raw.is_empty() || raw.len() > MAX_ID_LEN {
            return Err(InvalidArtifactId(raw.to_string()));
        }
        if raw.starts_with('.') || !raw.chars().all(is_id_char) {
            return Err(InvalidArtifactId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key of the audio file for this id.
    pub fn object_name(&self) -> String {
        format!("{}.mp3", self.0)
    }

    pub fn from_object_name(name: &str) -> Option<Self> {
        name.strip_suffix(".mp3").and_then(|raw| Self::parse(raw).ok())
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid artifact id: {0}")]
pub struct InvalidArtifactId(pub String);

fn is_id_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')
}

fn normalize_stem(filename: &str) -> String {
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let mut stem = String::with_capacity(basename.len());
    for c in basename.to_lowercase().chars() {
        let mapped = if is_id_char(c) { c } else { '-' };
        if mapped == '-' && stem.ends_with('-') {
            continue;
        }
        stem.push(mapped);
    }

    let trimmed: String = stem
        .trim_start_matches(['.', '-'])
        .trim_end_matches('-')
        .chars()
        .take(MAX_STEM_LEN)
        .collect();

    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed
    }
}
