//! API request and response models (DTOs).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{LibraryEntrySummaryRow, PinnedChannelDbModel};
use crate::domain::{MediaFormat, MediaItem};

// ============================================================================
// Query Gateway
// ============================================================================

/// Query parameters for `GET /api/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Query parameters for `GET /api/channel`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelQuery {
    pub url: Option<String>,
}

// ============================================================================
// Resolution Gateway
// ============================================================================

/// Query parameters for `GET /api/watch`.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchQuery {
    pub id: Option<String>,
}

/// Resolved playback locators for one media identifier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchResponse {
    pub video_url: String,
    pub audio_url: String,
    pub title: String,
}

// ============================================================================
// Stream Relay
// ============================================================================

/// Query parameters for `GET /api/proxy`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

// ============================================================================
// Library
// ============================================================================

/// Request body for `POST /api/library`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveToLibraryRequest {
    /// The media item being saved, as returned by search or channel listing.
    #[serde(flatten)]
    pub item: MediaItem,
    /// Container format the locator points at.
    pub format: MediaFormat,
    /// Locator to fetch the payload from.
    pub url: String,
}

/// One library entry in a listing (no payload).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntrySummary {
    #[serde(flatten)]
    pub item: MediaItem,
    pub format: String,
    /// Stored payload size in bytes.
    pub payload_size: i64,
    pub saved_at: DateTime<Utc>,
}

impl From<LibraryEntrySummaryRow> for LibraryEntrySummary {
    fn from(row: LibraryEntrySummaryRow) -> Self {
        Self {
            item: row.media_item(),
            format: row.format,
            payload_size: row.payload_size,
            saved_at: row.saved_at,
        }
    }
}

// ============================================================================
// Pinned channels
// ============================================================================

/// One pinned channel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedChannelDto {
    pub name: String,
    pub url: String,
    pub pinned_at: DateTime<Utc>,
}

impl From<PinnedChannelDbModel> for PinnedChannelDto {
    fn from(pin: PinnedChannelDbModel) -> Self {
        Self {
            name: pin.name,
            url: pin.channel_url,
            pinned_at: pin.pinned_at,
        }
    }
}

/// Request body for `POST /api/pins/toggle`.
#[derive(Debug, Clone, Deserialize)]
pub struct PinToggleRequest {
    pub name: String,
    pub url: String,
}

/// Response for `POST /api/pins/toggle`.
#[derive(Debug, Clone, Serialize)]
pub struct PinToggleResponse {
    /// Whether the channel is pinned after the toggle.
    pub pinned: bool,
}

// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}
