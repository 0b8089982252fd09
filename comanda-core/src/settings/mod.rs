//! Business configuration (feature flags)
//!
//! Rows of the `configuration` table are parsed into [`ConfigValue`] once, at
//! load time, and cached. Writes are validated against the key's declared kind
//! before they reach the database.

pub mod keys;

use crate::auth::{CurrentUser, permissions};
use crate::db::repository::{RepoError, config as config_repo};
use parking_lot::RwLock;
use shared::error::{AppError, ErrorCode};
use shared::models::{ConfigEntry, ConfigKind, ConfigValue, ConfigValueError};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Configuration key '{key}' expects {expected}, got {got}")]
    KindMismatch {
        key: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Invalid configuration value: {0}")]
    InvalidValue(#[from] ConfigValueError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::UnknownKey(key) => {
                AppError::with_message(ErrorCode::ConfigError, format!("Unknown configuration key: {key}"))
                    .with_detail("key", key)
            }
            e @ (SettingsError::KindMismatch { .. } | SettingsError::InvalidValue(_)) => {
                AppError::validation(e.to_string())
            }
            SettingsError::Repo(e) => e.into(),
        }
    }
}

/// Snapshot of the flags the order workflow consults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlags {
    pub use_tables: bool,
    pub allow_tableless_orders: bool,
    pub use_observations: bool,
    pub generate_tickets: bool,
    pub auto_refresh_tables: bool,
    pub use_user_system: bool,
    pub business_name: String,
    pub default_user: String,
}

impl FeatureFlags {
    /// A table must be chosen before items can be ordered
    pub fn table_required(&self) -> bool {
        self.use_tables && !self.allow_tableless_orders
    }
}

/// Cached, typed view over the `configuration` table
#[derive(Clone)]
pub struct SettingsService {
    pool: SqlitePool,
    cache: Arc<RwLock<HashMap<String, ConfigValue>>>,
}

impl std::fmt::Debug for SettingsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsService")
            .field("entries", &self.cache.read().len())
            .finish()
    }
}

impl SettingsService {
    /// Insert missing defaults, then load every entry into the cache
    pub async fn load(pool: SqlitePool) -> Result<Self, SettingsError> {
        for d in keys::DEFAULTS {
            if config_repo::insert_if_missing(&pool, d.key, d.value, d.kind, d.description).await? {
                tracing::debug!(key = d.key, value = d.value, "Inserted default setting");
            }
        }

        let service = Self {
            pool,
            cache: Arc::new(RwLock::new(HashMap::new())),
        };
        service.reload().await?;
        Ok(service)
    }

    /// Re-read every entry from the database
    ///
    /// Values that do not parse as their declared kind fall back to the
    /// built-in default (or are skipped for custom keys).
    pub async fn reload(&self) -> Result<(), SettingsError> {
        let entries = config_repo::find_all(&self.pool).await?;
        let mut values = HashMap::with_capacity(entries.len());

        for entry in entries {
            match ConfigValue::parse(entry.kind, &entry.config_value) {
                Ok(value) => {
                    values.insert(entry.config_key, value);
                }
                Err(e) => {
                    let fallback = keys::default_for(&entry.config_key)
                        .and_then(|d| ConfigValue::parse(d.kind, d.value).ok());
                    tracing::warn!(
                        key = %entry.config_key,
                        error = %e,
                        fallback = ?fallback,
                        "Invalid stored setting"
                    );
                    if let Some(value) = fallback {
                        values.insert(entry.config_key, value);
                    }
                }
            }
        }

        *self.cache.write() = values;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.cache.read().get(key).cloned()
    }

    /// Boolean flag; missing or non-boolean keys read as their default, else `false`
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .and_then(|v| v.as_bool())
            .or_else(|| keys::default_for(key).map(|d| shared::util::parse_flag(d.value)))
            .unwrap_or(false)
    }

    /// Text value; missing keys read as their default, else empty
    pub fn get_text(&self, key: &str) -> String {
        match self.get(key) {
            Some(ConfigValue::Text(v)) => v,
            Some(other) => other.to_raw(),
            None => keys::default_for(key)
                .map(|d| d.value.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn flags(&self) -> FeatureFlags {
        FeatureFlags {
            use_tables: self.get_bool(keys::USE_TABLES),
            allow_tableless_orders: self.get_bool(keys::ALLOW_TABLELESS_ORDERS),
            use_observations: self.get_bool(keys::USE_OBSERVATIONS),
            generate_tickets: self.get_bool(keys::GENERATE_TICKETS),
            auto_refresh_tables: self.get_bool(keys::AUTO_REFRESH_TABLES),
            use_user_system: self.get_bool(keys::USE_USER_SYSTEM),
            business_name: self.get_text(keys::BUSINESS_NAME),
            default_user: self.get_text(keys::DEFAULT_USER),
        }
    }

    /// Raw rows, for the administration screen
    pub async fn entries(&self) -> Result<Vec<ConfigEntry>, SettingsError> {
        Ok(config_repo::find_all(&self.pool).await?)
    }

    /// Store a typed value
    ///
    /// Existing keys keep their declared kind; a new key takes the kind of `value`.
    pub async fn set(
        &self,
        actor: &CurrentUser,
        key: &str,
        value: ConfigValue,
    ) -> Result<(), AppError> {
        actor.require_permission(permissions::SETTINGS_MANAGE)?;

        let declared = self.declared_kind(key);
        if let Some(expected) = declared
            && expected != value.kind()
        {
            return Err(SettingsError::KindMismatch {
                key: key.to_string(),
                expected: expected.as_str(),
                got: value.kind().as_str(),
            }
            .into());
        }

        let raw = value.to_raw();
        if declared.is_some() {
            config_repo::update_value(&self.pool, key, &raw).await?;
        } else {
            config_repo::upsert(&self.pool, key, &raw, value.kind(), None).await?;
        }
        self.cache.write().insert(key.to_string(), value);

        crate::audit_log!(actor.username, "settings.set", key, raw);
        Ok(())
    }

    /// Parse `raw` against the key's declared kind, then store it
    pub async fn set_raw(&self, actor: &CurrentUser, key: &str, raw: &str) -> Result<(), AppError> {
        let kind = self
            .declared_kind(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        let value = ConfigValue::parse(kind, raw).map_err(SettingsError::from)?;
        self.set(actor, key, value).await
    }

    /// Restore every built-in key to its default value
    pub async fn reset_defaults(&self, actor: &CurrentUser) -> Result<(), AppError> {
        actor.require_permission(permissions::SETTINGS_MANAGE)?;

        for d in keys::DEFAULTS {
            config_repo::upsert(&self.pool, d.key, d.value, d.kind, Some(d.description)).await?;
        }
        self.reload().await?;

        crate::audit_log!(actor.username, "settings.reset_defaults", "configuration");
        Ok(())
    }

    fn declared_kind(&self, key: &str) -> Option<ConfigKind> {
        self.cache
            .read()
            .get(key)
            .map(ConfigValue::kind)
            .or_else(|| keys::default_for(key).map(|d| d.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::Role;

    async fn service() -> SettingsService {
        let db = DbService::in_memory().await.unwrap();
        SettingsService::load(db.pool).await.unwrap()
    }

    fn admin() -> CurrentUser {
        CurrentUser::temporary_admin()
    }

    #[tokio::test]
    async fn test_defaults_loaded() {
        let settings = service().await;
        let flags = settings.flags();
        assert!(flags.use_tables);
        assert!(!flags.allow_tableless_orders);
        assert!(flags.table_required());
        assert_eq!(flags.business_name, "Restaurant");
        assert_eq!(settings.get_text(keys::CURRENCY), "$");
        assert_eq!(settings.entries().await.unwrap().len(), keys::DEFAULTS.len());
    }

    #[tokio::test]
    async fn test_set_validates_kind() {
        let settings = service().await;
        let err = settings
            .set(&admin(), keys::USE_TABLES, ConfigValue::Text("yes".into()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        settings
            .set_raw(&admin(), keys::ALLOW_TABLELESS_ORDERS, "si")
            .await
            .unwrap();
        assert!(settings.get_bool(keys::ALLOW_TABLELESS_ORDERS));
        assert!(!settings.flags().table_required());
    }

    #[tokio::test]
    async fn test_custom_key_keeps_its_kind() {
        let settings = service().await;
        settings
            .set(&admin(), "max_covers", ConfigValue::Int(40))
            .await
            .unwrap();
        let err = settings
            .set_raw(&admin(), "max_covers", "many")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(settings.get("max_covers"), Some(ConfigValue::Int(40)));
    }

    #[tokio::test]
    async fn test_invalid_stored_value_falls_back_to_default() {
        let db = DbService::in_memory().await.unwrap();
        config_repo::upsert(&db.pool, "use_tables", "true", ConfigKind::Bool, None)
            .await
            .unwrap();
        sqlx::query("UPDATE configuration SET kind = 'int', config_value = 'x' WHERE config_key = 'use_tables'")
            .execute(&db.pool)
            .await
            .unwrap();

        let settings = SettingsService::load(db.pool).await.unwrap();
        assert!(settings.get_bool(keys::USE_TABLES));
    }

    #[tokio::test]
    async fn test_reset_defaults() {
        let settings = service().await;
        settings
            .set_raw(&admin(), keys::BUSINESS_NAME, "Casa Pepe")
            .await
            .unwrap();
        settings.reset_defaults(&admin()).await.unwrap();
        assert_eq!(settings.get_text(keys::BUSINESS_NAME), "Restaurant");
    }

    #[tokio::test]
    async fn test_non_admin_cannot_change_settings() {
        let settings = service().await;
        let server = CurrentUser::new(Some(7), "ana", "Ana", Role::Server);
        let err = settings
            .set_raw(&server, keys::USE_TABLES, "false")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
        assert!(settings.get_bool(keys::USE_TABLES));
    }
}
