//! Storage port for the durable whitelist/blacklist tables.

use async_trait::async_trait;
use listwarden_domain::{BlacklistEntry, WhitelistEntry};
use serde::Serialize;

use super::error::StoreError;

/// A stored whitelist row, as returned to API readers.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistRow {
    #[sqlx(rename = "GameName")]
    pub game_name: String,
    #[sqlx(rename = "SavePath")]
    pub save_path: String,
    #[sqlx(rename = "ModPath")]
    pub mod_path: String,
    #[sqlx(rename = "AddPath")]
    pub add_path: String,
    #[sqlx(rename = "SpecialBackupMark")]
    pub special_backup_mark: i64,
}

/// A stored blacklist row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistRow {
    #[sqlx(rename = "GameName")]
    pub game_name: String,
}

/// Durable whitelist/blacklist storage.
///
/// Writes happen only for approved entries, with payloads already validated
/// by the domain layer; all queries are parameterized.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListStore: Send + Sync {
    async fn fetch_whitelist(&self) -> Result<Vec<WhitelistRow>, StoreError>;
    async fn fetch_blacklist(&self) -> Result<Vec<BlacklistRow>, StoreError>;
    async fn insert_whitelist(&self, entry: &WhitelistEntry) -> Result<(), StoreError>;
    async fn insert_blacklist(&self, entry: &BlacklistEntry) -> Result<(), StoreError>;
}
