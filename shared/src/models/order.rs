//! Order Model (comandas)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle state
///
/// `pending → in_preparation → completed`, and
/// `pending | in_preparation → cancelled`. Completed and cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Pending,
    InPreparation,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InPreparation => "in_preparation",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Pending or in preparation
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::InPreparation)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submitted order header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Human identifier, `ORD-YYYYMMDD-NN`
    pub order_number: String,
    pub table_id: Option<i64>,
    pub user_id: Option<i64>,
    /// Display name of the server who submitted it
    pub created_by: String,
    pub created_at: i64,
    /// Σ quantity × unit_price at submission, never recomputed
    pub total: f64,
    pub status: OrderStatus,
    pub observations: Option<String>,
}

/// Immutable order line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    /// Copied from the product at submission
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub note: Option<String>,
}

/// Line captured in the draft, persisted at submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub note: Option<String>,
}

/// Order control list row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderOverview {
    pub id: i64,
    pub order_number: String,
    pub created_at: i64,
    pub created_by: String,
    pub total: f64,
    pub status: OrderStatus,
    pub table_id: Option<i64>,
    pub table_name: Option<String>,
    pub table_status: Option<String>,
    pub item_count: i64,
}

/// Order with its items, the input of ticket rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub table_name: Option<String>,
    pub items: Vec<OrderItem>,
}

impl OrderDetail {
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity as i64).sum()
    }
}
