//! Persisted artifact types.

use serde::Serialize;

/// Media type of a generated image, determined by content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl MediaType {
    /// File extension for this media type, without the dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    /// MIME type string.
    #[must_use]
    pub const fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mime())
    }
}

/// A durably persisted artifact, referenced by history records via `name`.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    /// Unique, collision-resistant name (e.g. `image_<uuid>.jpg`).
    pub name: String,
    pub media_type: MediaType,
    /// Size of the persisted bytes.
    pub len: u64,
}
