//! User administration

use crate::auth::{CurrentUser, permissions};
use crate::db::repository::{RepoError, user as user_repo};
use crate::db::seed::ADMIN_USERNAME;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_USERNAME_LEN, validate_new_password, validate_required_text,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Role, User, UserCreate, UserUpdate};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, actor: &CurrentUser) -> AppResult<Vec<User>> {
        actor.require_permission(permissions::USERS_MANAGE)?;
        Ok(user_repo::find_all(&self.pool).await?)
    }

    pub async fn create(&self, actor: &CurrentUser, data: UserCreate) -> AppResult<User> {
        actor.require_permission(permissions::USERS_MANAGE)?;

        let username = data.username.trim();
        let display_name = data.display_name.trim();
        validate_required_text(username, "username", MAX_USERNAME_LEN)?;
        validate_required_text(display_name, "display_name", MAX_NAME_LEN)?;
        validate_new_password(&data.password, &data.password_confirm)?;

        if user_repo::username_taken(&self.pool, username, None).await? {
            return Err(username_exists(username));
        }

        let user = user_repo::create(&self.pool, username, &data.password, display_name, data.role)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => username_exists(username),
                other => other.into(),
            })?;
        crate::audit_log!(
            actor.username,
            "user.create",
            format!("user:{}", user.id),
            format!("{} ({})", user.username, user.role.as_str())
        );
        Ok(user)
    }

    pub async fn update(&self, actor: &CurrentUser, id: i64, mut data: UserUpdate) -> AppResult<User> {
        actor.require_permission(permissions::USERS_MANAGE)?;

        let existing = self.find(id).await?;

        if let Some(username) = &mut data.username {
            *username = username.trim().to_string();
            validate_required_text(username, "username", MAX_USERNAME_LEN)?;
            if user_repo::username_taken(&self.pool, username, Some(id)).await? {
                return Err(username_exists(username));
            }
        }
        if let Some(display_name) = &mut data.display_name {
            *display_name = display_name.trim().to_string();
            validate_required_text(display_name, "display_name", MAX_NAME_LEN)?;
        }

        // The built-in administrator keeps its name, role and active flag
        if existing.username == ADMIN_USERNAME {
            let renames = data.username.as_deref().is_some_and(|u| u != ADMIN_USERNAME);
            let demotes = data.role.is_some_and(|r| r != Role::Administrator);
            let disables = data.is_active == Some(false);
            if renames || demotes || disables {
                return Err(AppError::with_message(
                    ErrorCode::PermissionDenied,
                    "The built-in administrator must stay an active administrator",
                ));
            }
        }
        if actor.id == Some(id) && data.is_active == Some(false) {
            return Err(AppError::with_message(
                ErrorCode::CannotDeleteSelf,
                "You cannot deactivate your own account",
            ));
        }

        let user = user_repo::update(&self.pool, id, data).await?;
        crate::audit_log!(actor.username, "user.update", format!("user:{id}"), user.username);
        Ok(user)
    }

    /// Set a new password (administrators, or the user changing their own)
    pub async fn change_password(
        &self,
        actor: &CurrentUser,
        id: i64,
        password: &str,
        confirm: &str,
    ) -> AppResult<()> {
        if actor.id != Some(id) {
            actor.require_permission(permissions::USERS_MANAGE)?;
        }
        self.find(id).await?;
        validate_new_password(password, confirm)?;

        user_repo::update_password(&self.pool, id, password).await?;
        crate::audit_log!(actor.username, "user.change_password", format!("user:{id}"));
        Ok(())
    }

    /// Delete a user; not yourself, not the built-in admin, not with active orders
    pub async fn delete(&self, actor: &CurrentUser, id: i64) -> AppResult<()> {
        actor.require_permission(permissions::USERS_MANAGE)?;

        if actor.id == Some(id) {
            return Err(AppError::new(ErrorCode::CannotDeleteSelf));
        }
        let existing = self.find(id).await?;
        if existing.username == ADMIN_USERNAME {
            return Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "The built-in administrator cannot be deleted",
            ));
        }

        let active = user_repo::count_active_orders(&self.pool, id).await?;
        if active > 0 {
            return Err(AppError::with_message(
                ErrorCode::UserHasActiveOrders,
                format!("User '{}' has {active} active orders", existing.username),
            )
            .with_detail("active_orders", active));
        }

        user_repo::delete(&self.pool, id).await?;
        crate::audit_log!(actor.username, "user.delete", format!("user:{id}"), existing.username);
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<User> {
        user_repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
            })
    }
}

fn username_exists(username: &str) -> AppError {
    AppError::with_message(
        ErrorCode::UsernameExists,
        format!("Username '{username}' already exists"),
    )
}
