//! Pinned channel repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::Result;
use crate::database::models::PinnedChannelDbModel;

/// Keyed store for pinned channel references. Key = channel URL.
#[async_trait]
pub trait PinnedChannelRepository: Send + Sync {
    /// All pinned channels, newest pin first.
    async fn get_all(&self) -> Result<Vec<PinnedChannelDbModel>>;

    /// Look up a pin by channel URL.
    async fn get(&self, channel_url: &str) -> Result<Option<PinnedChannelDbModel>>;

    /// Insert or overwrite the pin with the same key.
    async fn put(&self, pin: &PinnedChannelDbModel) -> Result<()>;

    /// Remove a pin; deleting an absent key is a no-op.
    async fn delete(&self, channel_url: &str) -> Result<()>;
}

/// SQLx implementation of [`PinnedChannelRepository`].
pub struct SqlxPinnedChannelRepository {
    pool: SqlitePool,
}

impl SqlxPinnedChannelRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PinnedChannelRepository for SqlxPinnedChannelRepository {
    async fn get_all(&self) -> Result<Vec<PinnedChannelDbModel>> {
        let pins = sqlx::query_as::<_, PinnedChannelDbModel>(
            "SELECT * FROM pinned_channels ORDER BY pinned_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(pins)
    }

    async fn get(&self, channel_url: &str) -> Result<Option<PinnedChannelDbModel>> {
        let pin = sqlx::query_as::<_, PinnedChannelDbModel>(
            "SELECT * FROM pinned_channels WHERE channel_url = ?",
        )
        .bind(channel_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pin)
    }

    async fn put(&self, pin: &PinnedChannelDbModel) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO pinned_channels (channel_url, name, pinned_at) VALUES (?, ?, ?)",
        )
        .bind(&pin.channel_url)
        .bind(&pin.name)
        .bind(pin.pinned_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, channel_url: &str) -> Result<()> {
        sqlx::query("DELETE FROM pinned_channels WHERE channel_url = ?")
            .bind(channel_url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
