//! Table State Tracker
//!
//! Mutates a table's occupancy from the orders associated with it. Every
//! function takes a connection so the order manager can run it inside the
//! same transaction as the order write.

use super::TableError;
use crate::db::repository::{RepoError, dining_table as table_repo};
use shared::models::TableStatus;
use sqlx::{SqliteConnection, SqlitePool};

/// Mark the table occupied; occupying an occupied table is fine
pub async fn occupy(conn: &mut SqliteConnection, table_id: i64) -> Result<(), TableError> {
    if !table_repo::set_status(&mut *conn, table_id, TableStatus::Occupied).await? {
        return Err(TableError::NotFound(table_id));
    }
    tracing::debug!(table_id, "Table occupied");
    Ok(())
}

/// Release the table only when no pending/in-preparation order remains
///
/// Returns whether the table was released; "still busy" is not an error.
pub async fn try_auto_release(
    conn: &mut SqliteConnection,
    table_id: i64,
) -> Result<bool, TableError> {
    let active = table_repo::count_active_orders(&mut *conn, table_id).await?;
    if active > 0 {
        tracing::debug!(table_id, active, "Table keeps active orders, not released");
        return Ok(false);
    }
    if !table_repo::set_status(&mut *conn, table_id, TableStatus::Available).await? {
        return Err(TableError::NotFound(table_id));
    }
    tracing::info!(table_id, "Table auto-released");
    Ok(true)
}

/// Unconditionally mark the table available (manual override)
pub async fn release(conn: &mut SqliteConnection, table_id: i64) -> Result<(), TableError> {
    if !table_repo::set_status(&mut *conn, table_id, TableStatus::Available).await? {
        return Err(TableError::NotFound(table_id));
    }
    tracing::info!(table_id, "Table released");
    Ok(())
}

/// Delete a table that has no active orders
///
/// Count and delete run in one transaction. Historical orders keep existing
/// with their table reference cleared.
pub async fn delete_guarded(pool: &SqlitePool, table_id: i64) -> Result<(), TableError> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    if table_repo::find_by_id(&mut *tx, table_id).await?.is_none() {
        return Err(TableError::NotFound(table_id));
    }
    let active = table_repo::count_active_orders(&mut *tx, table_id).await?;
    if active > 0 {
        // Dropping the transaction rolls it back
        return Err(TableError::HasActiveOrders { table_id, active });
    }
    table_repo::delete(&mut *tx, table_id).await?;

    tx.commit().await.map_err(RepoError::from)?;
    tracing::info!(table_id, "Table deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::order::{self as order_repo, NewOrder};
    use shared::models::{DiningTableCreate, OrderStatus};

    async fn setup() -> (SqlitePool, i64) {
        let db = DbService::in_memory().await.unwrap();
        let table = table_repo::create(
            &db.pool,
            DiningTableCreate {
                name: "T1".into(),
                capacity: 4,
                zone: "Main".into(),
                status: None,
            },
        )
        .await
        .unwrap();
        (db.pool, table.id)
    }

    async fn add_order(pool: &SqlitePool, table_id: i64) -> i64 {
        order_repo::insert(
            pool,
            &NewOrder {
                order_number: "ORD-20240115-01",
                table_id: Some(table_id),
                user_id: None,
                created_by: "Ana",
                created_at: 0,
                total: 10.0,
                observations: None,
            },
        )
        .await
        .unwrap()
    }

    async fn status(pool: &SqlitePool, table_id: i64) -> String {
        table_repo::find_by_id(pool, table_id)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn test_occupy_twice_is_allowed() {
        let (pool, table_id) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        occupy(&mut conn, table_id).await.unwrap();
        occupy(&mut conn, table_id).await.unwrap();
        drop(conn);
        assert_eq!(status(&pool, table_id).await, "occupied");
    }

    #[tokio::test]
    async fn test_auto_release_waits_for_active_orders() {
        let (pool, table_id) = setup().await;
        let order_id = add_order(&pool, table_id).await;

        let mut conn = pool.acquire().await.unwrap();
        occupy(&mut conn, table_id).await.unwrap();
        assert!(!try_auto_release(&mut conn, table_id).await.unwrap());

        order_repo::transition(
            &mut *conn,
            order_id,
            &[OrderStatus::Pending],
            OrderStatus::Completed,
        )
        .await
        .unwrap();
        assert!(try_auto_release(&mut conn, table_id).await.unwrap());
        drop(conn);
        assert_eq!(status(&pool, table_id).await, "available");
    }

    #[tokio::test]
    async fn test_missing_table() {
        let (pool, _) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        assert!(matches!(
            occupy(&mut conn, 999).await,
            Err(TableError::NotFound(999))
        ));
        assert!(matches!(
            release(&mut conn, 999).await,
            Err(TableError::NotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_delete_guarded() {
        let (pool, table_id) = setup().await;
        let order_id = add_order(&pool, table_id).await;

        let err = delete_guarded(&pool, table_id).await.unwrap_err();
        assert!(matches!(err, TableError::HasActiveOrders { active: 1, .. }));
        assert!(table_repo::find_by_id(&pool, table_id).await.unwrap().is_some());

        order_repo::transition(&pool, order_id, &[OrderStatus::Pending], OrderStatus::Cancelled)
            .await
            .unwrap();
        delete_guarded(&pool, table_id).await.unwrap();
        assert!(table_repo::find_by_id(&pool, table_id).await.unwrap().is_none());

        let order = order_repo::find_by_id(&pool, order_id).await.unwrap().unwrap();
        assert_eq!(order.table_id, None);
    }
}
