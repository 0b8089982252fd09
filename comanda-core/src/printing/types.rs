//! Ticket data

use crate::orders::money;
use serde::{Deserialize, Serialize};
use shared::models::OrderDetail;

/// Layout variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStyle {
    /// Order ticket only
    Standard,
    /// Order ticket plus a tear-off stub with the pickup number
    #[default]
    WithCustomerStub,
}

/// One printed line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketLine {
    pub quantity: i32,
    pub name: String,
    pub subtotal: f64,
    pub note: Option<String>,
}

/// Everything a ticket shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketData {
    pub business_name: String,
    pub currency: String,
    /// `None` renders as "No table"
    pub table_name: Option<String>,
    pub order_number: String,
    pub created_at: i64,
    /// Display name of the server
    pub server_name: String,
    pub items: Vec<TicketLine>,
    pub observations: Option<String>,
    pub total: f64,
}

impl TicketData {
    pub fn from_detail(detail: &OrderDetail, business_name: &str, currency: &str) -> Self {
        let items = detail
            .items
            .iter()
            .map(|item| TicketLine {
                quantity: item.quantity,
                name: item.product_name.clone(),
                subtotal: money::to_f64(money::line_subtotal(item.quantity, item.unit_price)),
                note: item.note.clone().filter(|n| !n.trim().is_empty()),
            })
            .collect();

        Self {
            business_name: business_name.to_string(),
            currency: currency.to_string(),
            table_name: detail.table_name.clone(),
            order_number: detail.order.order_number.clone(),
            created_at: detail.order.created_at,
            server_name: detail.order.created_by.clone(),
            items,
            observations: detail.order.observations.clone(),
            total: detail.order.total,
        }
    }

    /// Pickup number, the trailing `NN` of the order number
    pub fn pickup_number(&self) -> &str {
        self.order_number
            .rsplit('-')
            .next()
            .unwrap_or(&self.order_number)
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity as i64).sum()
    }

    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency, amount)
    }
}
