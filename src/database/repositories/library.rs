//! Offline library repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::{LibraryEntryDbModel, LibraryEntrySummaryRow};
use crate::{Error, Result};

/// Keyed store for saved media entries.
///
/// One operation per transaction; no multi-entry atomicity is relied upon.
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Insert or overwrite the entry with the same key.
    async fn put(&self, entry: &LibraryEntryDbModel) -> Result<()>;

    /// All entries without payloads, newest save first.
    async fn get_all(&self) -> Result<Vec<LibraryEntrySummaryRow>>;

    /// Full entry including payload.
    async fn get(&self, video_id: &str) -> Result<LibraryEntryDbModel>;

    /// Remove an entry; deleting an absent key is a no-op.
    async fn delete(&self, video_id: &str) -> Result<()>;
}

/// SQLx implementation of [`LibraryRepository`].
pub struct SqlxLibraryRepository {
    pool: SqlitePool,
}

impl SqlxLibraryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LibraryRepository for SqlxLibraryRepository {
    async fn put(&self, entry: &LibraryEntryDbModel) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO library_entries
                (video_id, title, thumbnail, duration_label, author_name,
                 author_url, views_label, format, payload, saved_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.video_id)
        .bind(&entry.title)
        .bind(&entry.thumbnail)
        .bind(&entry.duration_label)
        .bind(&entry.author_name)
        .bind(&entry.author_url)
        .bind(&entry.views_label)
        .bind(&entry.format)
        .bind(&entry.payload)
        .bind(entry.saved_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<LibraryEntrySummaryRow>> {
        let rows = sqlx::query_as::<_, LibraryEntrySummaryRow>(
            r#"
            SELECT video_id, title, thumbnail, duration_label, author_name,
                   author_url, views_label, format,
                   length(payload) AS payload_size, saved_at
            FROM library_entries
            ORDER BY saved_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, video_id: &str) -> Result<LibraryEntryDbModel> {
        sqlx::query_as::<_, LibraryEntryDbModel>(
            "SELECT * FROM library_entries WHERE video_id = ?",
        )
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("LibraryEntry", video_id))
    }

    async fn delete(&self, video_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM library_entries WHERE video_id = ?")
            .bind(video_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
