//! MySQL-backed list storage.

use async_trait::async_trait;
use listwarden_domain::{BlacklistEntry, WhitelistEntry};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use crate::infrastructure::ports::{
    BlacklistRow, ListStore, StoreError, WhitelistRow,
};

/// MySQL implementation of the durable whitelist/blacklist store.
///
/// The pool re-establishes dropped connections on the next acquire, so
/// callers never deal with reconnect logic.
pub struct MySqlListStore {
    pool: MySqlPool,
}

impl MySqlListStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::database("connect", e))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS whitelist (
                GameName VARCHAR(255) NOT NULL,
                SavePath VARCHAR(1024) NOT NULL,
                ModPath VARCHAR(1024) NOT NULL DEFAULT '',
                AddPath VARCHAR(1024) NOT NULL DEFAULT '',
                SpecialBackupMark BIGINT NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database("schema", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blacklist (
                GameName VARCHAR(255) NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database("schema", e))?;

        Ok(())
    }
}

#[async_trait]
impl ListStore for MySqlListStore {
    async fn fetch_whitelist(&self) -> Result<Vec<WhitelistRow>, StoreError> {
        sqlx::query_as::<_, WhitelistRow>(
            "SELECT GameName, SavePath, ModPath, AddPath, SpecialBackupMark FROM whitelist",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::database("fetch_whitelist", e))
    }

    async fn fetch_blacklist(&self) -> Result<Vec<BlacklistRow>, StoreError> {
        sqlx::query_as::<_, BlacklistRow>("SELECT GameName FROM blacklist")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::database("fetch_blacklist", e))
    }

    async fn insert_whitelist(&self, entry: &WhitelistEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO whitelist (GameName, SavePath, ModPath, AddPath, SpecialBackupMark)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.game_name)
        .bind(&entry.save_path)
        .bind(&entry.mod_path)
        .bind(&entry.add_path)
        .bind(entry.special_backup_mark)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database("insert_whitelist", e))?;

        Ok(())
    }

    async fn insert_blacklist(&self, entry: &BlacklistEntry) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO blacklist (GameName) VALUES (?)")
            .bind(&entry.game_name)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::database("insert_blacklist", e))?;

        Ok(())
    }
}
