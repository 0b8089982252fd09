//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use sqlx::{SqliteExecutor, SqlitePool};

/// Table row joined with the counts the board needs
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TableOccupancyRow {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub status: String,
    pub zone: String,
    /// pending + in_preparation orders
    pub active_orders: i64,
    pub completed_orders: i64,
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id, name, capacity, status, zone FROM dining_tables ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

/// Tables that can take a new order
pub async fn find_available(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id, name, capacity, status, zone FROM dining_tables WHERE status = 'available' ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id, name, capacity, status, zone FROM dining_tables WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(table)
}

/// Whether another table already uses `name`
pub async fn name_taken(pool: &SqlitePool, name: &str, except_id: Option<i64>) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM dining_tables WHERE name = ?1 AND (?2 IS NULL OR id != ?2)",
    )
    .bind(name)
    .bind(except_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    let status = data.status.unwrap_or(TableStatus::Available);
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dining_tables (name, capacity, status, zone) VALUES (?1, ?2, ?3, ?4) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.capacity)
    .bind(status.as_str())
    .bind(&data.zone)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DiningTableUpdate) -> RepoResult<DiningTable> {
    let rows = sqlx::query(
        "UPDATE dining_tables SET name = COALESCE(?1, name), capacity = COALESCE(?2, capacity), zone = COALESCE(?3, zone), status = COALESCE(?4, status) WHERE id = ?5",
    )
    .bind(data.name)
    .bind(data.capacity)
    .bind(data.zone)
    .bind(data.status.map(|s| s.as_str()))
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dining table {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dining table {id} not found")))
}

/// Write the occupancy state; `false` when the table does not exist
pub async fn set_status<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    status: TableStatus,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE dining_tables SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM dining_tables WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// pending + in_preparation orders on the table
pub async fn count_active_orders<'e, E: SqliteExecutor<'e>>(
    executor: E,
    table_id: i64,
) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM orders WHERE table_id = ? AND status IN ('pending', 'in_preparation')",
    )
    .bind(table_id)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

/// Every table with its active and completed order counts
pub async fn find_occupancy(pool: &SqlitePool) -> RepoResult<Vec<TableOccupancyRow>> {
    let rows = sqlx::query_as::<_, TableOccupancyRow>(
        "SELECT t.id, t.name, t.capacity, t.status, t.zone, \
         COALESCE(SUM(CASE WHEN o.status IN ('pending', 'in_preparation') THEN 1 ELSE 0 END), 0) AS active_orders, \
         COALESCE(SUM(CASE WHEN o.status = 'completed' THEN 1 ELSE 0 END), 0) AS completed_orders \
         FROM dining_tables t LEFT JOIN orders o ON o.table_id = t.id \
         GROUP BY t.id ORDER BY t.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Number of tables per raw status string
pub async fn count_by_status(pool: &SqlitePool) -> RepoResult<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM dining_tables GROUP BY status",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
