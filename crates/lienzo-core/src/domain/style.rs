//! Style tags and their prompt transforms.
//!
//! Styles form a total mapping: every tag (including unknown ones and the
//! absent case) resolves to exactly one variant, with `Natural` as the
//! identity default. Resolution happens once per request.

use serde::{Deserialize, Serialize};

/// A named prompt style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Identity: the prompt is passed through unchanged.
    #[default]
    Natural,
    Anime,
    Realistic,
    Sketch,
    Retro,
}

impl Style {
    /// Resolve an optional style tag. Unknown tags map to `Natural`.
    #[must_use]
    pub fn resolve(tag: Option<&str>) -> Self {
        tag.and_then(Self::parse).unwrap_or_default()
    }

    /// Parse a style tag from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "natural" => Some(Self::Natural),
            "anime" => Some(Self::Anime),
            "realistic" => Some(Self::Realistic),
            "sketch" => Some(Self::Sketch),
            "retro" => Some(Self::Retro),
            _ => None,
        }
    }

    /// String representation of the tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Anime => "anime",
            Self::Realistic => "realistic",
            Self::Sketch => "sketch",
            Self::Retro => "retro",
        }
    }

    /// Apply this style's template to a prompt.
    #[must_use]
    pub fn apply(&self, prompt: &str) -> String {
        match self {
            Self::Natural => prompt.to_string(),
            Self::Anime => format!("{prompt}, anime style, cel shading, vibrant colors"),
            Self::Realistic => {
                format!("{prompt}, photorealistic, 8k, detailed lighting")
            }
            Self::Sketch => format!("{prompt}, pencil sketch, monochrome, hand drawn"),
            Self::Retro => format!("{prompt}, retro poster, grainy, muted palette"),
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
