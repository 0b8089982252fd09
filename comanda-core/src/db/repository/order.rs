//! Order Repository
//!
//! Orders and their items. Items are written once, as a batch, inside the
//! submitting transaction; the schema rejects later updates to items and totals.

use super::RepoResult;
use shared::models::{Order, OrderItem, OrderItemInput, OrderOverview, OrderStatus};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const COLUMNS: &str =
    "id, order_number, table_id, user_id, created_by, created_at, total, status, observations";

/// Header fields of a new order
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub table_id: Option<i64>,
    pub user_id: Option<i64>,
    pub created_by: &'a str,
    pub created_at: i64,
    pub total: f64,
    pub observations: Option<&'a str>,
}

/// Insert the order header as `pending`, returning its id
pub async fn insert<'e, E: SqliteExecutor<'e>>(executor: E, order: &NewOrder<'_>) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (order_number, table_id, user_id, created_by, created_at, total, status, observations) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7) RETURNING id",
    )
    .bind(order.order_number)
    .bind(order.table_id)
    .bind(order.user_id)
    .bind(order.created_by)
    .bind(order.created_at)
    .bind(order.total)
    .bind(order.observations)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Insert every item of an order
pub async fn insert_items(
    conn: &mut SqliteConnection,
    order_id: i64,
    items: &[OrderItemInput],
) -> RepoResult<()> {
    for item in items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_name, quantity, unit_price, note) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(order_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(&item.note)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(order)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_name, quantity, unit_price, note FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Move an order to `status`, only from one of `from`; `false` when no row matched
pub async fn transition<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    from: &[OrderStatus],
    status: OrderStatus,
) -> RepoResult<bool> {
    let allowed = from
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let rows = sqlx::query(&format!(
        "UPDATE orders SET status = ? WHERE id = ? AND status IN ({allowed})"
    ))
    .bind(status)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Order numbers already issued with the given prefix
pub async fn find_numbers_with_prefix<'e, E: SqliteExecutor<'e>>(
    executor: E,
    prefix: &str,
) -> RepoResult<Vec<String>> {
    let numbers = sqlx::query_scalar::<_, String>(
        "SELECT order_number FROM orders WHERE order_number LIKE ? || '%'",
    )
    .bind(prefix)
    .fetch_all(executor)
    .await?;
    Ok(numbers)
}

/// pending + in_preparation orders, oldest first
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE status IN ('pending', 'in_preparation') ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

/// Active orders on one table
pub async fn find_active_by_table(pool: &SqlitePool, table_id: i64) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE table_id = ? AND status IN ('pending', 'in_preparation') ORDER BY created_at, id"
    ))
    .bind(table_id)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

/// Order control list: every non-cancelled order with its table, newest first
pub async fn find_overview(pool: &SqlitePool) -> RepoResult<Vec<OrderOverview>> {
    let rows = sqlx::query_as::<_, OrderOverview>(
        "SELECT o.id, o.order_number, o.created_at, o.created_by, o.total, o.status, o.table_id, \
         t.name AS table_name, t.status AS table_status, \
         (SELECT COALESCE(SUM(i.quantity), 0) FROM order_items i WHERE i.order_id = o.id) AS item_count \
         FROM orders o LEFT JOIN dining_tables t ON t.id = o.table_id \
         WHERE o.status IN ('pending', 'in_preparation', 'completed') \
         ORDER BY o.created_at DESC, o.id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Order counts per status created in `[start, end)`
pub async fn count_by_status_between(
    pool: &SqlitePool,
    start: i64,
    end: i64,
) -> RepoResult<Vec<(OrderStatus, i64)>> {
    let rows = sqlx::query_as::<_, (OrderStatus, i64)>(
        "SELECT status, COUNT(*) FROM orders WHERE created_at >= ? AND created_at < ? GROUP BY status",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Active orders regardless of date
pub async fn count_active(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM orders WHERE status IN ('pending', 'in_preparation')",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_items(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn new_order(number: &str) -> NewOrder<'_> {
        NewOrder {
            order_number: number,
            table_id: None,
            user_id: None,
            created_by: "Ana",
            created_at: 1_705_300_000_000,
            total: 2500.0,
            observations: Some("sin prisa"),
        }
    }

    fn item(name: &str, quantity: i32, unit_price: f64) -> OrderItemInput {
        OrderItemInput {
            product_id: 1,
            product_name: name.to_string(),
            quantity,
            unit_price,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_insert_with_items_in_transaction() {
        let db = DbService::in_memory().await.unwrap();
        let mut tx = db.pool.begin().await.unwrap();
        let id = insert(&mut *tx, &new_order("ORD-20240115-01")).await.unwrap();
        insert_items(&mut tx, id, &[item("Pizza", 2, 1000.0), item("Agua", 1, 500.0)])
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let order = find_by_id(&db.pool, id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, 2500.0);
        let items = find_items(&db.pool, id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_name, "Pizza");
    }

    #[tokio::test]
    async fn test_transition_respects_source_states() {
        let db = DbService::in_memory().await.unwrap();
        let id = insert(&db.pool, &new_order("ORD-20240115-01")).await.unwrap();

        let moved = transition(&db.pool, id, &[OrderStatus::InPreparation], OrderStatus::Completed)
            .await
            .unwrap();
        assert!(!moved);

        let moved = transition(
            &db.pool,
            id,
            &[OrderStatus::Pending, OrderStatus::InPreparation],
            OrderStatus::Completed,
        )
        .await
        .unwrap();
        assert!(moved);
        let order = find_by_id(&db.pool, id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_items_and_total_are_immutable() {
        let db = DbService::in_memory().await.unwrap();
        let mut tx = db.pool.begin().await.unwrap();
        let id = insert(&mut *tx, &new_order("ORD-20240115-01")).await.unwrap();
        insert_items(&mut tx, id, &[item("Pizza", 1, 10.0)]).await.unwrap();
        tx.commit().await.unwrap();

        let result = sqlx::query("UPDATE order_items SET quantity = 5 WHERE order_id = ?")
            .bind(id)
            .execute(&db.pool)
            .await;
        assert!(result.is_err());

        let result = sqlx::query("UPDATE orders SET total = 1 WHERE id = ?")
            .bind(id)
            .execute(&db.pool)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_numbers_with_prefix() {
        let db = DbService::in_memory().await.unwrap();
        insert(&db.pool, &new_order("ORD-20240115-01")).await.unwrap();
        insert(&db.pool, &new_order("ORD-20240115-02")).await.unwrap();
        insert(&db.pool, &new_order("ORD-20240114-07")).await.unwrap();

        let mut numbers = find_numbers_with_prefix(&db.pool, "ORD-20240115-")
            .await
            .unwrap();
        numbers.sort();
        assert_eq!(numbers, ["ORD-20240115-01", "ORD-20240115-02"]);
    }
}
