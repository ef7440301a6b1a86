//! Core domain types shared between the extractor, the store and the API.

use serde::{Deserialize, Serialize};

/// One playable video as returned by search or channel listings.
///
/// Field names match the wire shape the frontend consumes
/// (`videoId`, `timestamp` is the duration label, `views` is a label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub video_id: String,
    pub title: String,
    /// Thumbnail locator.
    pub thumbnail: String,
    /// Duration label, e.g. "3:45" or "1:02:10".
    pub timestamp: String,
    pub author: AuthorRef,
    /// View-count label; empty when the source does not report one.
    #[serde(default)]
    pub views: String,
}

/// Author / channel reference embedded in a [`MediaItem`].
///
/// The channel URL doubles as the pinning key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Transient pair of playback locators produced per watch request.
///
/// Upstream locators are time-limited; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTracks {
    pub video_url: String,
    pub audio_url: String,
}

/// Closed set of container formats a library entry can be saved as.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Mp4,
    M4a,
}

impl MediaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::M4a => "m4a",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mp4" => Some(Self::Mp4),
            "m4a" => Some(Self::M4a),
            _ => None,
        }
    }

    /// Content type used when serving a stored payload.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::M4a => "audio/mp4",
        }
    }
}
