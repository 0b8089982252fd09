//! Login and session start

use super::CurrentUser;
use crate::db::repository::user as user_repo;
use crate::settings::FeatureFlags;
use shared::error::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Authenticate an active user and record the access time
    ///
    /// Passwords are compared by equality.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<CurrentUser> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Username and password are required",
            ));
        }

        let Some(user) = user_repo::find_by_credentials(&self.pool, username, password).await?
        else {
            let reason = match user_repo::find_by_username(&self.pool, username).await? {
                Some(u) if !u.is_active => "account_disabled",
                Some(_) => "invalid_password",
                None => "unknown_user",
            };
            crate::security_log!(WARN, "login_failed", username = %username, reason = reason);
            return Err(AppError::invalid_credentials());
        };

        user_repo::touch_last_access(&self.pool, user.id, shared::util::now_millis()).await?;
        crate::security_log!(INFO, "login_success", username = %user.username, role = %user.role.as_str());

        Ok(CurrentUser::from(&user))
    }

    /// Session used when login is disabled
    ///
    /// Runs as the configured default user; when that user does not exist (or is
    /// inactive) a temporary administrator session is used instead.
    pub async fn default_session(&self, flags: &FeatureFlags) -> AppResult<CurrentUser> {
        match user_repo::find_by_username(&self.pool, &flags.default_user).await? {
            Some(user) if user.is_active => {
                user_repo::touch_last_access(&self.pool, user.id, shared::util::now_millis())
                    .await?;
                tracing::info!(username = %user.username, "Session started with default user");
                Ok(CurrentUser::from(&user))
            }
            _ => {
                tracing::warn!(
                    default_user = %flags.default_user,
                    "Default user not available, using temporary administrator"
                );
                Ok(CurrentUser::temporary_admin())
            }
        }
    }

    /// Start a session according to the flags: login when the user system is on
    pub async fn start_session(
        &self,
        flags: &FeatureFlags,
        credentials: Option<(&str, &str)>,
    ) -> AppResult<CurrentUser> {
        if !flags.use_user_system {
            return self.default_session(flags).await;
        }
        match credentials {
            Some((username, password)) => self.login(username, password).await,
            None => Err(AppError::not_authenticated()),
        }
    }
}
