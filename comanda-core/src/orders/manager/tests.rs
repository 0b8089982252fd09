use super::*;
use crate::db::DbService;
use crate::db::repository::dining_table as table_repo;
use shared::models::{DiningTableCreate, Role};

async fn setup() -> (OrdersManager, SqlitePool) {
    let db = DbService::in_memory().await.unwrap();
    let manager = OrdersManager::new(db.pool.clone(), chrono_tz::Europe::Madrid);
    (manager, db.pool)
}

async fn create_table(pool: &SqlitePool, name: &str) -> i64 {
    table_repo::create(
        pool,
        DiningTableCreate {
            name: name.into(),
            capacity: 4,
            zone: "Main".into(),
            status: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn table_status(pool: &SqlitePool, table_id: i64) -> String {
    table_repo::find_by_id(pool, table_id).await.unwrap().unwrap().status
}

fn flags() -> FeatureFlags {
    FeatureFlags {
        use_tables: true,
        allow_tableless_orders: false,
        use_observations: true,
        generate_tickets: false,
        auto_refresh_tables: true,
        use_user_system: true,
        business_name: "Restaurant".into(),
        default_user: "admin".into(),
    }
}

fn server() -> CurrentUser {
    CurrentUser::new(None, "ana", "Ana", Role::Server)
}

fn item(product_id: i64, name: &str, quantity: i32, unit_price: f64) -> OrderItemInput {
    OrderItemInput {
        product_id,
        product_name: name.into(),
        quantity,
        unit_price,
        note: None,
    }
}

fn request(table_id: Option<i64>) -> SubmitRequest {
    SubmitRequest {
        items: vec![item(1, "Burger", 2, 1000.0), item(2, "Soda", 1, 500.0)],
        table_id,
        observations: None,
    }
}

// ========================================================================
// Submit
// ========================================================================

#[tokio::test]
async fn test_submit_occupies_and_complete_releases() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;

    let outcome = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();
    assert_eq!(outcome.total(), 2500.0);
    assert!(!outcome.degraded);
    assert!(outcome.order_number().ends_with("-01"));
    assert_eq!(outcome.order.status, OrderStatus::Pending);
    assert_eq!(outcome.order.created_by, "Ana");
    assert_eq!(table_status(&pool, t1).await, "occupied");

    let detail = manager.detail(outcome.order.id).await.unwrap();
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.items[0].product_name, "Burger");
    assert_eq!(detail.item_count(), 3);
    assert_eq!(detail.table_name.as_deref(), Some("T1"));

    let done = manager.complete(outcome.order.id, &server()).await.unwrap();
    assert!(done.table_released());
    assert_eq!(done.order().status, OrderStatus::Completed);
    assert_eq!(table_status(&pool, t1).await, "available");
}

#[tokio::test]
async fn test_fractional_cent_prices_keep_total_equal_to_items() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;

    let req = SubmitRequest {
        items: vec![item(1, "Taster", 1, 0.125), item(2, "Olive", 3, 0.333)],
        table_id: Some(t1),
        observations: None,
    };
    let outcome = manager.submit(req, &server(), &flags()).await.unwrap();
    assert_eq!(outcome.total(), 1.12);

    let stored = order_repo::find_items(&pool, outcome.order.id).await.unwrap();
    let prices: Vec<f64> = stored.iter().map(|i| i.unit_price).collect();
    assert_eq!(prices, vec![0.13, 0.33]);

    let sum: rust_decimal::Decimal = stored
        .iter()
        .map(|i| money::line_subtotal(i.quantity, i.unit_price))
        .sum();
    assert_eq!(money::to_decimal(outcome.order.total), sum);
}

#[tokio::test]
async fn test_sequence_increments_per_day() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;

    let mut numbers = Vec::new();
    for _ in 0..3 {
        let outcome = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();
        numbers.push(outcome.order.order_number);
    }
    assert!(numbers[0].ends_with("-01"));
    assert!(numbers[1].ends_with("-02"));
    assert!(numbers[2].ends_with("-03"));
}

#[tokio::test]
async fn test_empty_order_writes_nothing() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;

    let err = manager
        .submit(SubmitRequest { table_id: Some(t1), ..Default::default() }, &server(), &flags())
        .await
        .unwrap_err();
    assert!(matches!(err, ManagerError::EmptyOrder));
    assert_eq!(order_repo::count(&pool).await.unwrap(), 0);
    assert_eq!(table_status(&pool, t1).await, "available");
}

#[tokio::test]
async fn test_missing_table_writes_nothing() {
    let (manager, pool) = setup().await;

    let err = manager.submit(request(None), &server(), &flags()).await.unwrap_err();
    assert!(matches!(err, ManagerError::NoTableSelected));
    assert_eq!(order_repo::count(&pool).await.unwrap(), 0);
    assert_eq!(order_repo::count_items(&pool).await.unwrap(), 0);

    // Tableless orders allowed
    let tableless = FeatureFlags {
        allow_tableless_orders: true,
        ..flags()
    };
    let outcome = manager.submit(request(None), &server(), &tableless).await.unwrap();
    assert_eq!(outcome.order.table_id, None);
}

#[tokio::test]
async fn test_tables_disabled_ignores_selection() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;
    let no_tables = FeatureFlags {
        use_tables: false,
        use_observations: false,
        ..flags()
    };

    let mut req = request(Some(t1));
    req.observations = Some("No salt".into());
    let outcome = manager.submit(req, &server(), &no_tables).await.unwrap();
    assert_eq!(outcome.order.table_id, None);
    assert_eq!(outcome.order.observations, None);
    assert_eq!(table_status(&pool, t1).await, "available");
}

#[tokio::test]
async fn test_unknown_table_rolls_back() {
    let (manager, pool) = setup().await;

    let err = manager.submit(request(Some(42)), &server(), &flags()).await.unwrap_err();
    assert!(matches!(err, ManagerError::Table(crate::tables::TableError::NotFound(42))));
    assert_eq!(order_repo::count(&pool).await.unwrap(), 0);
    assert_eq!(order_repo::count_items(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_items_rejected() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;

    for bad in [
        item(1, "Burger", 0, 1000.0),
        item(1, "Burger", 1, -1.0),
        item(1, "Burger", 1, f64::NAN),
        item(1, "  ", 1, 1.0),
    ] {
        let req = SubmitRequest {
            items: vec![bad],
            table_id: Some(t1),
            observations: None,
        };
        let err = manager.submit(req, &server(), &flags()).await.unwrap_err();
        assert!(matches!(err, ManagerError::InvalidItem(_)));
    }
    assert_eq!(order_repo::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_submit_session_resets_on_success_only() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;
    let table = table_repo::find_by_id(&pool, t1).await.unwrap().unwrap();
    let burger = shared::models::Product {
        id: 1,
        name: "Burger".into(),
        price: 1000.0,
        category: "Mains".into(),
        is_available: true,
        description: None,
    };

    let mut session = Session::new(server());
    let err = manager.submit_session(&mut session, &flags()).await.unwrap_err();
    assert!(matches!(err, ManagerError::EmptyOrder));

    session.select_table(table);
    session.add_product(&burger, &flags()).unwrap();
    session.set_observations("Birthday");
    let outcome = manager.submit_session(&mut session, &flags()).await.unwrap();
    assert_eq!(outcome.total(), 1000.0);
    assert_eq!(outcome.order.observations.as_deref(), Some("Birthday"));
    assert!(session.is_empty());
    assert!(session.selected_table().is_none());
}

// ========================================================================
// Lifecycle
// ========================================================================

#[tokio::test]
async fn test_table_stays_occupied_until_last_order_completes() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;

    let o1 = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();
    let o2 = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();

    let first = manager.complete(o1.order.id, &server()).await.unwrap();
    assert!(!first.table_released());
    assert_eq!(table_status(&pool, t1).await, "occupied");

    let second = manager.complete(o2.order.id, &server()).await.unwrap();
    assert!(second.table_released());
    assert_eq!(table_status(&pool, t1).await, "available");
}

#[tokio::test]
async fn test_complete_twice_is_a_notice() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;
    let o1 = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();

    manager.complete(o1.order.id, &server()).await.unwrap();
    let again = manager.complete(o1.order.id, &server()).await.unwrap();
    assert!(matches!(again, CompleteOutcome::AlreadyCompleted { .. }));
    assert!(!again.table_released());
}

#[tokio::test]
async fn test_cancel_releases_unconditionally() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;
    let o1 = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();
    let _o2 = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();

    let cancelled = manager.cancel(o1.order.id, &server()).await.unwrap();
    assert!(cancelled.table_released);
    assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
    assert_eq!(table_status(&pool, t1).await, "available");

    let err = manager.cancel(o1.order.id, &server()).await.unwrap_err();
    assert!(matches!(err, ManagerError::AlreadyCancelled(_)));

    let err = manager.complete(o1.order.id, &server()).await.unwrap_err();
    assert!(matches!(
        err,
        ManagerError::InvalidTransition { from: OrderStatus::Cancelled, .. }
    ));
}

#[tokio::test]
async fn test_cannot_cancel_completed() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;
    let o1 = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();
    manager.complete(o1.order.id, &server()).await.unwrap();

    let err = manager.cancel(o1.order.id, &server()).await.unwrap_err();
    assert!(matches!(err, ManagerError::CannotCancelCompleted(_)));
    let order = order_repo::find_by_id(&pool, o1.order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
}

#[tokio::test]
async fn test_start_preparation() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;
    let o1 = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();

    let order = manager.start_preparation(o1.order.id, &server()).await.unwrap();
    assert_eq!(order.status, OrderStatus::InPreparation);

    let err = manager.start_preparation(o1.order.id, &server()).await.unwrap_err();
    assert!(matches!(err, ManagerError::InvalidTransition { .. }));

    // Still active, the table stays occupied
    assert_eq!(table_status(&pool, t1).await, "occupied");
    let done = manager.complete(o1.order.id, &server()).await.unwrap();
    assert!(done.table_released());
}

#[tokio::test]
async fn test_release_table_requires_confirmation_for_active_orders() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;
    let o1 = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();

    let err = manager
        .release_table_for(o1.order.id, false, &server())
        .await
        .unwrap_err();
    assert!(matches!(err, ManagerError::ConfirmationRequired { .. }));
    assert_eq!(table_status(&pool, t1).await, "occupied");

    let released = manager.release_table_for(o1.order.id, true, &server()).await.unwrap();
    assert_eq!(released, t1);
    assert_eq!(table_status(&pool, t1).await, "available");

    // Order state is untouched
    let order = order_repo::find_by_id(&pool, o1.order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_release_table_without_table() {
    let (manager, _pool) = setup().await;
    let tableless = FeatureFlags {
        allow_tableless_orders: true,
        ..flags()
    };
    let o1 = manager.submit(request(None), &server(), &tableless).await.unwrap();

    let err = manager.release_table_for(o1.order.id, true, &server()).await.unwrap_err();
    assert!(matches!(err, ManagerError::OrderHasNoTable(_)));

    let err = manager.complete(999, &server()).await.unwrap_err();
    assert!(matches!(err, ManagerError::OrderNotFound(999)));
}

// ========================================================================
// Queries & events
// ========================================================================

#[tokio::test]
async fn test_stats_and_active_lists() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;
    let t2 = create_table(&pool, "T2").await;

    let o1 = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();
    let o2 = manager.submit(request(Some(t2)), &server(), &flags()).await.unwrap();
    let o3 = manager.submit(request(Some(t2)), &server(), &flags()).await.unwrap();
    manager.start_preparation(o2.order.id, &server()).await.unwrap();
    manager.complete(o1.order.id, &server()).await.unwrap();
    manager.cancel(o3.order.id, &server()).await.unwrap();

    let stats = manager.today_stats().await.unwrap();
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.in_preparation, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.active_total, 1);
    assert_eq!(stats.today_total(), 3);

    let active = manager.active_orders().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, o2.order.id);
    assert!(manager.active_orders_for_table(t1).await.unwrap().is_empty());

    let overview = manager.overview().await.unwrap();
    assert_eq!(overview.len(), 2);
    assert_eq!(overview[0].id, o2.order.id);
    assert_eq!(overview[0].item_count, 3);
}

#[tokio::test]
async fn test_changes_are_broadcast() {
    let (manager, pool) = setup().await;
    let t1 = create_table(&pool, "T1").await;
    let mut rx = manager.subscribe();

    let o1 = manager.submit(request(Some(t1)), &server(), &flags()).await.unwrap();
    manager.complete(o1.order.id, &server()).await.unwrap();

    let submitted = rx.recv().await.unwrap();
    assert_eq!(submitted.kind, OrderChangeKind::Submitted);
    assert_eq!(submitted.table_id, Some(t1));
    assert!(!submitted.table_released);

    let completed = rx.recv().await.unwrap();
    assert_eq!(completed.kind, OrderChangeKind::Completed);
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(completed.table_released);
}

#[test]
fn test_error_codes() {
    use shared::error::{AppError, ErrorCode};

    let err: AppError = ManagerError::EmptyOrder.into();
    assert_eq!(err.code, ErrorCode::OrderEmpty);
    let err: AppError = ManagerError::NoTableSelected.into();
    assert_eq!(err.code, ErrorCode::NoTableSelected);
    let err: AppError = ManagerError::CannotCancelCompleted("ORD-20240115-01".into()).into();
    assert_eq!(err.code, ErrorCode::OrderCannotCancelCompleted);
    let err: AppError = ManagerError::ConfirmationRequired {
        order_number: "ORD-20240115-01".into(),
        status: OrderStatus::Pending,
    }
    .into();
    assert_eq!(err.code, ErrorCode::ConfirmationRequired);
}
