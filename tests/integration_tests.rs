//! Integration tests for the shimatube persistence layer.
//!
//! These tests use a real SQLite database (in-memory, single connection so
//! every query sees the same database) to verify repository operations
//! against the actual schema.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use shimatube::database::DbPool;
use shimatube::database::models::{LibraryEntryDbModel, PinnedChannelDbModel};
use shimatube::database::repositories::{
    LibraryRepository, PinnedChannelRepository, SqlxLibraryRepository, SqlxPinnedChannelRepository,
};
use shimatube::domain::{AuthorRef, MediaFormat, MediaItem};

/// Helper to create a test database pool with migrations applied.
async fn setup_test_db() -> DbPool {
    let options =
        SqliteConnectOptions::from_str("sqlite::memory:").expect("Failed to parse options");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    shimatube::database::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn media_item(id: &str) -> MediaItem {
    MediaItem {
        video_id: id.to_string(),
        title: format!("Title for {id}"),
        thumbnail: format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg"),
        timestamp: "3:45".to_string(),
        author: AuthorRef {
            name: "Some Channel".to_string(),
            url: Some("https://youtube.com/@somechannel".to_string()),
        },
        views: "1200".to_string(),
    }
}

mod database_tests {
    use super::*;

    #[tokio::test]
    async fn test_database_migrations() {
        let pool = setup_test_db().await;

        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .expect("Failed to query tables");

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();

        assert!(
            table_names.contains(&"library_entries"),
            "library_entries table missing"
        );
        assert!(
            table_names.contains(&"pinned_channels"),
            "pinned_channels table missing"
        );
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = setup_test_db().await;

        // A second run must be a no-op, not an error.
        shimatube::database::run_migrations(&pool)
            .await
            .expect("re-running migrations failed");
    }
}

mod library_repository_tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get_all_includes_entry_once() {
        let pool = setup_test_db().await;
        let repo = SqlxLibraryRepository::new(pool);

        let first = LibraryEntryDbModel::new(media_item("abc123"), MediaFormat::Mp4, vec![1, 2, 3]);
        repo.put(&first).await.expect("put failed");

        // Overwrite with the same key, different payload.
        let second =
            LibraryEntryDbModel::new(media_item("abc123"), MediaFormat::M4a, vec![9; 1024]);
        repo.put(&second).await.expect("overwrite failed");

        let all = repo.get_all().await.expect("get_all failed");
        assert_eq!(all.len(), 1, "overwrite must not duplicate the key");
        assert_eq!(all[0].video_id, "abc123");
        assert_eq!(all[0].format, "m4a");
        assert_eq!(all[0].payload_size, 1024);
    }

    #[tokio::test]
    async fn test_get_returns_full_payload() {
        let pool = setup_test_db().await;
        let repo = SqlxLibraryRepository::new(pool);

        let payload: Vec<u8> = (0..255).collect();
        let entry = LibraryEntryDbModel::new(media_item("vid1"), MediaFormat::Mp4, payload.clone());
        repo.put(&entry).await.expect("put failed");

        let stored = repo.get("vid1").await.expect("get failed");
        assert_eq!(stored.payload, payload);
        assert_eq!(stored.format, "mp4");
        assert_eq!(stored.author_name, "Some Channel");
    }

    #[tokio::test]
    async fn test_get_absent_entry_is_not_found() {
        let pool = setup_test_db().await;
        let repo = SqlxLibraryRepository::new(pool);

        let err = repo.get("missing").await.unwrap_err();
        assert!(matches!(err, shimatube::Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_all_sorts_by_save_time_descending() {
        let pool = setup_test_db().await;
        let repo = SqlxLibraryRepository::new(pool);

        let mut older = LibraryEntryDbModel::new(media_item("older"), MediaFormat::Mp4, vec![0]);
        older.saved_at -= chrono::Duration::seconds(60);
        let newer = LibraryEntryDbModel::new(media_item("newer"), MediaFormat::Mp4, vec![0]);

        repo.put(&older).await.expect("put failed");
        repo.put(&newer).await.expect("put failed");

        let all = repo.get_all().await.expect("get_all failed");
        let ids: Vec<&str> = all.iter().map(|e| e.video_id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_delete_and_absent_delete_is_no_op() {
        let pool = setup_test_db().await;
        let repo = SqlxLibraryRepository::new(pool);

        let entry = LibraryEntryDbModel::new(media_item("vid1"), MediaFormat::Mp4, vec![1]);
        repo.put(&entry).await.expect("put failed");

        repo.delete("vid1").await.expect("delete failed");
        assert!(repo.get_all().await.expect("get_all failed").is_empty());

        // Deleting again must not error.
        repo.delete("vid1").await.expect("absent delete errored");
    }
}

mod pinned_channel_repository_tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete_round_trip() {
        let pool = setup_test_db().await;
        let repo = SqlxPinnedChannelRepository::new(pool);

        let url = "https://youtube.com/@somechannel";
        let pin = PinnedChannelDbModel::new(url, "Some Channel");
        repo.put(&pin).await.expect("put failed");

        let stored = repo.get(url).await.expect("get failed");
        assert_eq!(stored.as_ref().map(|p| p.name.as_str()), Some("Some Channel"));

        repo.delete(url).await.expect("delete failed");
        assert!(repo.get(url).await.expect("get failed").is_none());

        // Absent delete is a no-op.
        repo.delete(url).await.expect("absent delete errored");
    }

    #[tokio::test]
    async fn test_put_same_key_overwrites() {
        let pool = setup_test_db().await;
        let repo = SqlxPinnedChannelRepository::new(pool);

        let url = "https://youtube.com/@somechannel";
        repo.put(&PinnedChannelDbModel::new(url, "Old Name"))
            .await
            .expect("put failed");
        repo.put(&PinnedChannelDbModel::new(url, "New Name"))
            .await
            .expect("overwrite failed");

        let all = repo.get_all().await.expect("get_all failed");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "New Name");
    }

    #[tokio::test]
    async fn test_get_all_sorts_by_pin_time_descending() {
        let pool = setup_test_db().await;
        let repo = SqlxPinnedChannelRepository::new(pool);

        let mut older = PinnedChannelDbModel::new("https://youtube.com/@first", "First");
        older.pinned_at -= chrono::Duration::seconds(60);
        let newer = PinnedChannelDbModel::new("https://youtube.com/@second", "Second");

        repo.put(&older).await.expect("put failed");
        repo.put(&newer).await.expect("put failed");

        let all = repo.get_all().await.expect("get_all failed");
        let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }
}
