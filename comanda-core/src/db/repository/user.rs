//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{Role, User, UserUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, username, password, display_name, role, is_active, last_access_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users ORDER BY username"))
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users WHERE username = ? LIMIT 1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Active user with matching credentials (plain equality)
pub async fn find_by_credentials(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users WHERE username = ? AND password = ? AND is_active = 1 LIMIT 1"
    ))
    .bind(username)
    .bind(password)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn username_taken(
    pool: &SqlitePool,
    username: &str,
    except_id: Option<i64>,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM users WHERE username = ?1 AND (?2 IS NULL OR id != ?2)",
    )
    .bind(username)
    .bind(except_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    display_name: &str,
    role: Role,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, password, display_name, role, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 1, ?5) RETURNING id",
    )
    .bind(username)
    .bind(password)
    .bind(display_name)
    .bind(role)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserUpdate) -> RepoResult<User> {
    let rows = sqlx::query(
        "UPDATE users SET username = COALESCE(?1, username), display_name = COALESCE(?2, display_name), role = COALESCE(?3, role), is_active = COALESCE(?4, is_active) WHERE id = ?5",
    )
    .bind(data.username)
    .bind(data.display_name)
    .bind(data.role)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn update_password(pool: &SqlitePool, id: i64, password: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE users SET password = ? WHERE id = ?")
        .bind(password)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

pub async fn touch_last_access(pool: &SqlitePool, id: i64, at: i64) -> RepoResult<()> {
    sqlx::query("UPDATE users SET last_access_at = ? WHERE id = ?")
        .bind(at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// pending + in_preparation orders submitted by the user
pub async fn count_active_orders(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM orders WHERE user_id = ? AND status IN ('pending', 'in_preparation')",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
