//! libSQL backend — async `Store` implementation.
//!
//! Supports local file and in-memory databases. Upsert semantics for
//! community rows come from `ON CONFLICT`; the exception set is a join
//! table whose composite primary key makes duplicate adds a no-op.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::traits::{CommunityConfig, Store};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS communities (
        community_id TEXT PRIMARY KEY,
        response_channel TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS exception_channels (
        community_id TEXT NOT NULL,
        channel_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        PRIMARY KEY (community_id, channel_id)
    );

    CREATE TABLE IF NOT EXISTS bad_words (
        word TEXT PRIMARY KEY,
        created_at TEXT NOT NULL
    );
"#;

/// libSQL store backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and initialize the schema.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Open(format!("Failed to create store directory: {e}")))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Store opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("Failed to create in-memory database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(SCHEMA)
            .await
            .map_err(|e| StoreError::Open(format!("Failed to initialize schema: {e}")))?;
        debug!("Store schema initialized");
        Ok(())
    }

    /// Ensure a community row exists without touching its binding.
    async fn ensure_community(&self, community_id: &str) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO communities (community_id, response_channel, created_at, updated_at)
                 VALUES (?1, NULL, ?2, ?2)
                 ON CONFLICT(community_id) DO NOTHING",
                params![community_id, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("ensure_community: {e}")))?;
        Ok(())
    }

    /// Exception channels for one community, sorted for stable output.
    async fn exception_channels(&self, community_id: &str) -> Result<Vec<String>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT channel_id FROM exception_channels WHERE community_id = ?1 ORDER BY channel_id",
                params![community_id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("exception_channels: {e}")))?;

        let mut channels = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            let channel: String = row
                .get(0)
                .map_err(|e| StoreError::Query(format!("exception_channels row: {e}")))?;
            channels.push(channel);
        }
        Ok(channels)
    }
}

#[async_trait]
impl Store for LibSqlBackend {
    async fn find_community(
        &self,
        community_id: &str,
    ) -> Result<Option<CommunityConfig>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT community_id, response_channel FROM communities WHERE community_id = ?1",
                params![community_id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("find_community: {e}")))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(StoreError::Query(format!("find_community row: {e}"))),
        };

        let community_id: String = row
            .get(0)
            .map_err(|e| StoreError::Query(format!("find_community row: {e}")))?;
        let response_channel: Option<String> = row.get(1).ok();
        let exception_channels = self.exception_channels(&community_id).await?;

        Ok(Some(CommunityConfig {
            community_id,
            response_channel,
            exception_channels,
        }))
    }

    async fn bind_response_channel(
        &self,
        community_id: &str,
        channel_id: &str,
    ) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO communities (community_id, response_channel, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(community_id) DO UPDATE SET
                     response_channel = excluded.response_channel,
                     updated_at = excluded.updated_at",
                params![community_id, channel_id, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("bind_response_channel: {e}")))?;

        debug!(community = community_id, channel = channel_id, "Response channel bound");
        Ok(())
    }

    async fn add_exception_channel(
        &self,
        community_id: &str,
        channel_id: &str,
    ) -> Result<(), StoreError> {
        self.ensure_community(community_id).await?;

        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT OR IGNORE INTO exception_channels (community_id, channel_id, created_at)
                 VALUES (?1, ?2, ?3)",
                params![community_id, channel_id, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("add_exception_channel: {e}")))?;

        debug!(community = community_id, channel = channel_id, "Exception channel added");
        Ok(())
    }

    async fn list_communities(&self) -> Result<Vec<CommunityConfig>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT community_id, response_channel FROM communities ORDER BY community_id",
                (),
            )
            .await
            .map_err(|e| StoreError::Query(format!("list_communities: {e}")))?;

        let mut configs = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            let community_id: String = row
                .get(0)
                .map_err(|e| StoreError::Query(format!("list_communities row: {e}")))?;
            let response_channel: Option<String> = row.get(1).ok();
            configs.push(CommunityConfig {
                community_id,
                response_channel,
                exception_channels: Vec::new(),
            });
        }

        for config in &mut configs {
            config.exception_channels = self.exception_channels(&config.community_id).await?;
        }
        Ok(configs)
    }

    async fn list_words(&self) -> Result<Vec<String>, StoreError> {
        let mut rows = self
            .conn
            .query("SELECT word FROM bad_words ORDER BY word", ())
            .await
            .map_err(|e| StoreError::Query(format!("list_words: {e}")))?;

        let mut words = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            let word: String = row
                .get(0)
                .map_err(|e| StoreError::Query(format!("list_words row: {e}")))?;
            words.push(word);
        }
        Ok(words)
    }

    async fn add_word(&self, word: &str) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT OR IGNORE INTO bad_words (word, created_at) VALUES (?1, ?2)",
                params![word, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("add_word: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_missing_community_is_none() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        assert_eq!(store.find_community("g1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn bind_creates_then_updates() {
        let store = LibSqlBackend::new_memory().await.unwrap();

        store.bind_response_channel("g1", "c1").await.unwrap();
        let config = store.find_community("g1").await.unwrap().unwrap();
        assert_eq!(config.response_channel.as_deref(), Some("c1"));

        store.bind_response_channel("g1", "c2").await.unwrap();
        let config = store.find_community("g1").await.unwrap().unwrap();
        assert_eq!(config.response_channel.as_deref(), Some("c2"));

        // Still one row.
        assert_eq!(store.list_communities().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn exception_add_is_idempotent() {
        let store = LibSqlBackend::new_memory().await.unwrap();

        store.add_exception_channel("g1", "c1").await.unwrap();
        let before = store
            .find_community("g1")
            .await
            .unwrap()
            .unwrap()
            .exception_channels
            .len();

        store.add_exception_channel("g1", "c2").await.unwrap();
        store.add_exception_channel("g1", "c2").await.unwrap();

        let config = store.find_community("g1").await.unwrap().unwrap();
        assert_eq!(config.exception_channels.len(), before + 1);
        assert!(config.is_exception("c1"));
        assert!(config.is_exception("c2"));
    }

    #[tokio::test]
    async fn exception_add_creates_config_without_binding() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        store.add_exception_channel("g1", "c1").await.unwrap();

        let config = store.find_community("g1").await.unwrap().unwrap();
        assert_eq!(config.response_channel, None);

        // A later bind keeps the exception set.
        store.bind_response_channel("g1", "c9").await.unwrap();
        let config = store.find_community("g1").await.unwrap().unwrap();
        assert_eq!(config.response_channel.as_deref(), Some("c9"));
        assert!(config.is_exception("c1"));
    }

    #[tokio::test]
    async fn list_communities_includes_exceptions() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        store.bind_response_channel("g1", "c1").await.unwrap();
        store.bind_response_channel("g2", "c2").await.unwrap();
        store.add_exception_channel("g2", "x1").await.unwrap();

        let configs = store.list_communities().await.unwrap();
        assert_eq!(configs.len(), 2);
        let g2 = configs.iter().find(|c| c.community_id == "g2").unwrap();
        assert_eq!(g2.exception_channels, vec!["x1".to_string()]);
    }

    #[tokio::test]
    async fn words_roundtrip_and_dedupe() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        assert!(store.list_words().await.unwrap().is_empty());

        store.add_word("grok").await.unwrap();
        store.add_word("zap").await.unwrap();
        store.add_word("grok").await.unwrap();

        assert_eq!(
            store.list_words().await.unwrap(),
            vec!["grok".to_string(), "zap".to_string()]
        );
    }

    #[tokio::test]
    async fn open_creates_parent_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("warden.db");
        let store = LibSqlBackend::new_local(&path).await.unwrap();
        store.add_word("grok").await.unwrap();
        assert!(path.exists());
    }
}
