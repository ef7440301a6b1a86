//! Pinned channel database model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A bookmarked channel reference. Key = `channel_url`.
#[derive(Debug, Clone, FromRow)]
pub struct PinnedChannelDbModel {
    pub channel_url: String,
    pub name: String,
    pub pinned_at: DateTime<Utc>,
}

impl PinnedChannelDbModel {
    pub fn new(channel_url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            channel_url: channel_url.into(),
            name: name.into(),
            pinned_at: Utc::now(),
        }
    }
}
