use std::path::Path;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("database directory error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable set of identifiers that were already delivered.
#[derive(Debug, Clone)]
pub struct DeliveryStore {
    pool: SqlitePool,
}

impl DeliveryStore {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Opens the database file at `path`, creating it and its parent
    /// directory when missing.
    pub async fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::connect(&to_sqlite_url(path)).await
    }

    pub async fn exists(&self, id: &str) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM sent WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn record(&self, id: &str, link: &str, published: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT OR IGNORE INTO sent (id, link, published) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(link)
            .bind(published)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sent")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn to_sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    async fn memory_store() -> DeliveryStore {
        DeliveryStore::connect("sqlite::memory:")
            .await
            .expect("connect must succeed")
    }

    #[tokio::test]
    async fn migration_creates_sent_table() {
        let store = memory_store().await;
        let columns = sqlx::query("PRAGMA table_info(sent)")
            .fetch_all(&store.pool)
            .await
            .expect("pragma should succeed");

        let names: Vec<String> = columns
            .iter()
            .map(|row| row.get::<String, _>("name"))
            .collect();
        assert_eq!(names, vec!["id", "link", "published"]);
    }

    #[tokio::test]
    async fn recorded_id_exists() {
        let store = memory_store().await;

        assert!(!store.exists("abc").await.expect("lookup should succeed"));
        store
            .record("abc", "https://example.com/a", "24.02.2026 12:30")
            .await
            .expect("record should succeed");

        assert!(store.exists("abc").await.expect("lookup should succeed"));
        assert!(!store.exists("abd").await.expect("lookup should succeed"));
    }

    #[tokio::test]
    async fn record_is_idempotent() {
        let store = memory_store().await;

        store
            .record("dup", "https://example.com/first", "")
            .await
            .expect("first record should succeed");
        store
            .record("dup", "https://example.com/second", "01.01.2026 03:00")
            .await
            .expect("second record should not fail");

        assert_eq!(store.count().await.expect("count should succeed"), 1);
        let row = sqlx::query("SELECT link, published FROM sent WHERE id = 'dup'")
            .fetch_one(&store.pool)
            .await
            .expect("row should exist");
        assert_eq!(row.get::<String, _>("link"), "https://example.com/first");
        assert_eq!(row.get::<String, _>("published"), "");
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("state").join("news.db");

        let store = DeliveryStore::open(&path).await.expect("open should succeed");
        store
            .record("persisted", "https://example.com/p", "")
            .await
            .expect("record should succeed");
        store.close().await;

        let reopened = DeliveryStore::open(&path)
            .await
            .expect("reopen should succeed");
        assert!(reopened
            .exists("persisted")
            .await
            .expect("lookup should succeed"));
        assert_eq!(reopened.count().await.expect("count should succeed"), 1);
    }
}
