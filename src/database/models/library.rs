//! Library entry database models.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{AuthorRef, MediaFormat, MediaItem};

/// One saved media item: metadata plus the downloaded payload.
///
/// Key = `video_id`; a later save of the same id overwrites the row.
#[derive(Debug, Clone, FromRow)]
pub struct LibraryEntryDbModel {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub duration_label: String,
    pub author_name: String,
    pub author_url: Option<String>,
    pub views_label: String,
    /// Format tag, one of the [`MediaFormat`] set.
    pub format: String,
    pub payload: Vec<u8>,
    pub saved_at: DateTime<Utc>,
}

impl LibraryEntryDbModel {
    pub fn new(item: MediaItem, format: MediaFormat, payload: Vec<u8>) -> Self {
        Self {
            video_id: item.video_id,
            title: item.title,
            thumbnail: item.thumbnail,
            duration_label: item.timestamp,
            author_name: item.author.name,
            author_url: item.author.url,
            views_label: item.views,
            format: format.as_str().to_string(),
            payload,
            saved_at: Utc::now(),
        }
    }
}

/// Library row without the payload column, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct LibraryEntrySummaryRow {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub duration_label: String,
    pub author_name: String,
    pub author_url: Option<String>,
    pub views_label: String,
    pub format: String,
    /// `length(payload)` in bytes.
    pub payload_size: i64,
    pub saved_at: DateTime<Utc>,
}

impl LibraryEntrySummaryRow {
    pub fn media_item(&self) -> MediaItem {
        MediaItem {
            video_id: self.video_id.clone(),
            title: self.title.clone(),
            thumbnail: self.thumbnail.clone(),
            timestamp: self.duration_label.clone(),
            author: AuthorRef {
                name: self.author_name.clone(),
                url: self.author_url.clone(),
            },
            views: self.views_label.clone(),
        }
    }
}
