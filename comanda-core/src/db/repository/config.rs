//! Configuration Repository
//!
//! Raw key/value rows; typed parsing happens in [`crate::settings`].

use super::{RepoError, RepoResult};
use shared::models::{ConfigEntry, ConfigKind};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ConfigEntry>> {
    let entries = sqlx::query_as::<_, ConfigEntry>(
        "SELECT config_key, config_value, kind, description, updated_at FROM configuration ORDER BY config_key",
    )
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

pub async fn find_by_key(pool: &SqlitePool, key: &str) -> RepoResult<Option<ConfigEntry>> {
    let entry = sqlx::query_as::<_, ConfigEntry>(
        "SELECT config_key, config_value, kind, description, updated_at FROM configuration WHERE config_key = ?",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(entry)
}

/// Insert or overwrite an entry
pub async fn upsert(
    pool: &SqlitePool,
    key: &str,
    value: &str,
    kind: ConfigKind,
    description: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO configuration (config_key, config_value, kind, description, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(config_key) DO UPDATE SET config_value = excluded.config_value, kind = excluded.kind, \
         description = COALESCE(excluded.description, configuration.description), updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(kind)
    .bind(description)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert an entry only if the key is absent; `true` when inserted
pub async fn insert_if_missing(
    pool: &SqlitePool,
    key: &str,
    value: &str,
    kind: ConfigKind,
    description: &str,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "INSERT OR IGNORE INTO configuration (config_key, config_value, kind, description, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(key)
    .bind(value)
    .bind(kind)
    .bind(description)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Overwrite the value of an existing key
pub async fn update_value(pool: &SqlitePool, key: &str, value: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE configuration SET config_value = ?, updated_at = ? WHERE config_key = ?")
        .bind(value)
        .bind(now)
        .bind(key)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Configuration key '{key}' not found")));
    }
    Ok(())
}
