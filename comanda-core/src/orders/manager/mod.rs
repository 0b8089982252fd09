//! OrdersManager - order lifecycle and table reconciliation
//!
//! Every mutation runs in one SQLite transaction together with the table
//! occupancy change it implies, then broadcasts an [`OrderChange`].
//!
//! # Submit Flow
//!
//! ```text
//! submit(request, user, flags)
//!     ├─ 1. Apply flags (drop table / observations when disabled)
//!     ├─ 2. Validate (empty draft, missing table, item fields)  → no writes on failure
//!     ├─ 3. Begin transaction
//!     ├─ 4. Occupy table (unknown table aborts here)
//!     ├─ 5. Next ticket number (degrades instead of failing)
//!     ├─ 6. Insert order header + items
//!     ├─ 7. Commit
//!     └─ 8. Broadcast + audit
//! ```
//!
//! # States
//!
//! ```text
//! pending ──► in_preparation ──► completed
//!    │               │
//!    └───────────────┴─────────► cancelled
//! ```

mod error;
pub use error::*;

use super::events::{EVENT_CHANNEL_CAPACITY, OrderChange, OrderChangeKind};
use super::money;
use super::sequencer;
use super::session::{Session, SubmitRequest};
use crate::auth::CurrentUser;
use crate::db::repository::order::{self as order_repo, NewOrder};
use crate::settings::FeatureFlags;
use crate::tables::tracker;
use crate::utils::time;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PRICE, MAX_QUANTITY};
use chrono_tz::Tz;
use shared::models::{Order, OrderDetail, OrderItemInput, OrderOverview, OrderStats, OrderStatus};
use shared::util::now_millis;
use sqlx::SqlitePool;
use tokio::sync::broadcast;

/// Result of a successful submission
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub order: Order,
    /// The ticket number came from the clock fallback
    pub degraded: bool,
}

impl SubmitOutcome {
    pub fn order_number(&self) -> &str {
        &self.order.order_number
    }

    pub fn total(&self) -> f64 {
        self.order.total
    }
}

#[derive(Debug, Clone)]
pub enum CompleteOutcome {
    Completed { order: Order, table_released: bool },
    /// Nothing changed, the order was completed earlier
    AlreadyCompleted { order: Order },
}

impl CompleteOutcome {
    pub fn order(&self) -> &Order {
        match self {
            CompleteOutcome::Completed { order, .. } | CompleteOutcome::AlreadyCompleted { order } => order,
        }
    }

    pub fn table_released(&self) -> bool {
        matches!(self, CompleteOutcome::Completed { table_released: true, .. })
    }
}

#[derive(Debug, Clone)]
pub struct CancelOutcome {
    pub order: Order,
    pub table_released: bool,
}

pub struct OrdersManager {
    pool: SqlitePool,
    tz: Tz,
    event_tx: broadcast::Sender<OrderChange>,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("tz", &self.tz)
            .field("subscribers", &self.event_tx.receiver_count())
            .finish()
    }
}

impl OrdersManager {
    pub fn new(pool: SqlitePool, tz: Tz) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { pool, tz, event_tx }
    }

    /// Subscribe to committed order changes
    pub fn subscribe(&self) -> broadcast::Receiver<OrderChange> {
        self.event_tx.subscribe()
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    // ========== Commands ==========

    /// Persist a draft as a `pending` order and occupy its table
    pub async fn submit(
        &self,
        request: SubmitRequest,
        user: &CurrentUser,
        flags: &FeatureFlags,
    ) -> ManagerResult<SubmitOutcome> {
        let SubmitRequest {
            mut items,
            table_id,
            observations,
        } = request;
        let table_id = if flags.use_tables { table_id } else { None };
        let observations = if flags.use_observations {
            observations
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
        } else {
            None
        };

        if items.is_empty() {
            return Err(ManagerError::EmptyOrder);
        }
        if flags.table_required() && table_id.is_none() {
            return Err(ManagerError::NoTableSelected);
        }
        validate_items(&items)?;
        for item in &mut items {
            item.unit_price = money::round_price(item.unit_price);
        }
        if let Some(text) = &observations
            && text.chars().count() > MAX_NOTE_LEN
        {
            return Err(ManagerError::InvalidItem(format!(
                "Observations are too long (max {MAX_NOTE_LEN} characters)"
            )));
        }

        let total = money::order_total(&items);
        let created_at = now_millis();

        let mut tx = self.pool.begin().await?;
        if let Some(table_id) = table_id {
            tracker::occupy(&mut tx, table_id).await?;
        }
        let ticket = sequencer::next_number(&mut tx, self.tz).await;
        let order_id = order_repo::insert(
            &mut *tx,
            &NewOrder {
                order_number: &ticket.order_number,
                table_id,
                user_id: user.id,
                created_by: &user.display_name,
                created_at,
                total,
                observations: observations.as_deref(),
            },
        )
        .await?;
        order_repo::insert_items(&mut tx, order_id, &items).await?;
        let order = order_repo::find_by_id(&mut *tx, order_id)
            .await?
            .ok_or(ManagerError::OrderNotFound(order_id))?;
        tx.commit().await?;

        tracing::info!(
            order_id,
            order_number = %order.order_number,
            table_id = ?order.table_id,
            items = items.len(),
            total,
            degraded = ticket.degraded,
            "Order submitted"
        );
        crate::audit_log!(
            user.username,
            "order.submit",
            format!("order:{}", order.order_number),
            format!("total={total}")
        );
        self.publish(OrderChangeKind::Submitted, &order, false);

        Ok(SubmitOutcome {
            order,
            degraded: ticket.degraded,
        })
    }

    /// Submit the session's draft; the session is reset only on success
    pub async fn submit_session(
        &self,
        session: &mut Session,
        flags: &FeatureFlags,
    ) -> ManagerResult<SubmitOutcome> {
        let outcome = self.submit(session.to_request(), session.user(), flags).await?;
        session.finish_submission();
        Ok(outcome)
    }

    /// `pending → in_preparation`
    pub async fn start_preparation(&self, order_id: i64, actor: &CurrentUser) -> ManagerResult<Order> {
        let mut tx = self.pool.begin().await?;
        let order = load(&mut tx, order_id).await?;
        if order.status != OrderStatus::Pending {
            return Err(ManagerError::InvalidTransition {
                order_number: order.order_number,
                from: order.status,
                to: OrderStatus::InPreparation,
            });
        }
        order_repo::transition(&mut *tx, order_id, &[OrderStatus::Pending], OrderStatus::InPreparation)
            .await?;
        tx.commit().await?;

        let order = Order {
            status: OrderStatus::InPreparation,
            ..order
        };
        tracing::info!(order_id, order_number = %order.order_number, "Order in preparation");
        crate::audit_log!(actor.username, "order.start_preparation", format!("order:{}", order.order_number));
        self.publish(OrderChangeKind::PreparationStarted, &order, false);
        Ok(order)
    }

    /// Complete an order and release its table if nothing else is active on it
    pub async fn complete(&self, order_id: i64, actor: &CurrentUser) -> ManagerResult<CompleteOutcome> {
        let mut tx = self.pool.begin().await?;
        let order = load(&mut tx, order_id).await?;
        match order.status {
            OrderStatus::Completed => {
                tracing::info!(order_id, order_number = %order.order_number, "Order already completed");
                return Ok(CompleteOutcome::AlreadyCompleted { order });
            }
            OrderStatus::Cancelled => {
                return Err(ManagerError::InvalidTransition {
                    order_number: order.order_number,
                    from: order.status,
                    to: OrderStatus::Completed,
                });
            }
            OrderStatus::Pending | OrderStatus::InPreparation => {}
        }

        order_repo::transition(
            &mut *tx,
            order_id,
            &[OrderStatus::Pending, OrderStatus::InPreparation],
            OrderStatus::Completed,
        )
        .await?;
        let table_released = match order.table_id {
            Some(table_id) => tracker::try_auto_release(&mut tx, table_id).await?,
            None => false,
        };
        tx.commit().await?;

        let order = Order {
            status: OrderStatus::Completed,
            ..order
        };
        tracing::info!(
            order_id,
            order_number = %order.order_number,
            table_id = ?order.table_id,
            table_released,
            "Order completed"
        );
        crate::audit_log!(actor.username, "order.complete", format!("order:{}", order.order_number));
        self.publish(OrderChangeKind::Completed, &order, table_released);
        Ok(CompleteOutcome::Completed { order, table_released })
    }

    /// Cancel an active order and unconditionally free its table
    pub async fn cancel(&self, order_id: i64, actor: &CurrentUser) -> ManagerResult<CancelOutcome> {
        let mut tx = self.pool.begin().await?;
        let order = load(&mut tx, order_id).await?;
        match order.status {
            OrderStatus::Cancelled => return Err(ManagerError::AlreadyCancelled(order.order_number)),
            OrderStatus::Completed => return Err(ManagerError::CannotCancelCompleted(order.order_number)),
            OrderStatus::Pending | OrderStatus::InPreparation => {}
        }

        order_repo::transition(
            &mut *tx,
            order_id,
            &[OrderStatus::Pending, OrderStatus::InPreparation],
            OrderStatus::Cancelled,
        )
        .await?;
        let table_released = match order.table_id {
            Some(table_id) => {
                tracker::release(&mut tx, table_id).await?;
                true
            }
            None => false,
        };
        tx.commit().await?;

        let order = Order {
            status: OrderStatus::Cancelled,
            ..order
        };
        tracing::info!(
            order_id,
            order_number = %order.order_number,
            table_id = ?order.table_id,
            "Order cancelled"
        );
        crate::audit_log!(actor.username, "order.cancel", format!("order:{}", order.order_number));
        self.publish(OrderChangeKind::Cancelled, &order, table_released);
        Ok(CancelOutcome { order, table_released })
    }

    /// Manually free the table of an order, whatever the order's state
    ///
    /// Needs `confirmed` unless the order is completed. Returns the released
    /// table id.
    pub async fn release_table_for(
        &self,
        order_id: i64,
        confirmed: bool,
        actor: &CurrentUser,
    ) -> ManagerResult<i64> {
        let mut tx = self.pool.begin().await?;
        let order = load(&mut tx, order_id).await?;
        let Some(table_id) = order.table_id else {
            return Err(ManagerError::OrderHasNoTable(order.order_number));
        };
        if order.status != OrderStatus::Completed && !confirmed {
            return Err(ManagerError::ConfirmationRequired {
                order_number: order.order_number,
                status: order.status,
            });
        }
        tracker::release(&mut tx, table_id).await?;
        tx.commit().await?;

        tracing::info!(
            order_id,
            order_number = %order.order_number,
            table_id,
            status = %order.status,
            "Table released manually"
        );
        crate::audit_log!(
            actor.username,
            "table.release",
            format!("table:{table_id}"),
            format!("order={}", order.order_number)
        );
        self.publish(OrderChangeKind::TableReleased, &order, true);
        Ok(table_id)
    }

    // ========== Queries ==========

    /// Pending and in-preparation orders, oldest first
    pub async fn active_orders(&self) -> ManagerResult<Vec<Order>> {
        Ok(order_repo::find_active(&self.pool).await?)
    }

    pub async fn active_orders_for_table(&self, table_id: i64) -> ManagerResult<Vec<Order>> {
        Ok(order_repo::find_active_by_table(&self.pool, table_id).await?)
    }

    /// Today's orders by state (business timezone) plus active orders of any date
    pub async fn today_stats(&self) -> ManagerResult<OrderStats> {
        let today = time::today(self.tz);
        let start = time::day_start_millis(today, self.tz);
        let end = time::day_end_millis(today, self.tz);

        let mut stats = OrderStats::default();
        for (status, count) in order_repo::count_by_status_between(&self.pool, start, end).await? {
            match status {
                OrderStatus::Pending => stats.pending = count,
                OrderStatus::InPreparation => stats.in_preparation = count,
                OrderStatus::Completed => stats.completed = count,
                OrderStatus::Cancelled => stats.cancelled = count,
            }
        }
        stats.active_total = order_repo::count_active(&self.pool).await?;
        Ok(stats)
    }

    /// Order control list, newest first
    pub async fn overview(&self) -> ManagerResult<Vec<OrderOverview>> {
        Ok(order_repo::find_overview(&self.pool).await?)
    }

    /// Order with its items in insertion order
    pub async fn detail(&self, order_id: i64) -> ManagerResult<OrderDetail> {
        let order = order_repo::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(ManagerError::OrderNotFound(order_id))?;
        let table_name = match order.table_id {
            Some(table_id) => crate::db::repository::dining_table::find_by_id(&self.pool, table_id)
                .await?
                .map(|t| t.name),
            None => None,
        };
        let items = order_repo::find_items(&self.pool, order_id).await?;
        Ok(OrderDetail {
            order,
            table_name,
            items,
        })
    }

    fn publish(&self, kind: OrderChangeKind, order: &Order, table_released: bool) {
        let change = OrderChange {
            kind,
            order_id: order.id,
            order_number: order.order_number.clone(),
            table_id: order.table_id,
            status: order.status,
            table_released,
            timestamp: now_millis(),
        };
        // No subscribers is fine
        let _ = self.event_tx.send(change);
    }
}

async fn load(conn: &mut sqlx::SqliteConnection, order_id: i64) -> ManagerResult<Order> {
    order_repo::find_by_id(&mut *conn, order_id)
        .await?
        .ok_or(ManagerError::OrderNotFound(order_id))
}

fn validate_items(items: &[OrderItemInput]) -> ManagerResult<()> {
    for item in items {
        let name = item.product_name.trim();
        if name.is_empty() {
            return Err(ManagerError::InvalidItem("product name is required".into()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ManagerError::InvalidItem(format!("product name '{name}' is too long")));
        }
        if item.quantity < 1 || item.quantity > MAX_QUANTITY {
            return Err(ManagerError::InvalidItem(format!(
                "quantity of '{name}' must be between 1 and {MAX_QUANTITY}"
            )));
        }
        if !item.unit_price.is_finite() || item.unit_price < 0.0 || item.unit_price > MAX_PRICE {
            return Err(ManagerError::InvalidItem(format!("price of '{name}' is invalid")));
        }
        if let Some(note) = &item.note
            && note.chars().count() > MAX_NOTE_LEN
        {
            return Err(ManagerError::InvalidItem(format!("note of '{name}' is too long")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
