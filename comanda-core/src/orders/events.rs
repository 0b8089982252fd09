//! Order change notifications
//!
//! Broadcast after every committed order/table mutation so views (the table
//! board) can refresh immediately instead of waiting for the next tick.

use serde::{Deserialize, Serialize};
use shared::models::OrderStatus;

/// Broadcast channel capacity
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderChangeKind {
    Submitted,
    PreparationStarted,
    Completed,
    Cancelled,
    TableReleased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderChange {
    pub kind: OrderChangeKind,
    pub order_id: i64,
    pub order_number: String,
    pub table_id: Option<i64>,
    pub status: OrderStatus,
    /// The table went back to `available` as part of this change
    pub table_released: bool,
    pub timestamp: i64,
}
