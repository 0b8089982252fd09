//! Order-taking session
//!
//! Holds who is taking orders, the draft being assembled, the selected table
//! and free-text observations. Nothing here touches the database; the draft
//! only becomes an order through [`OrdersManager::submit_session`].
//!
//! [`OrdersManager::submit_session`]: super::OrdersManager::submit_session

use super::ManagerError;
use super::money;
use crate::auth::CurrentUser;
use crate::settings::FeatureFlags;
use crate::utils::validation::{MAX_NOTE_LEN, MAX_QUANTITY, normalize_optional};
use shared::models::{DiningTable, OrderItemInput, Product};

/// What the manager needs to persist an order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitRequest {
    pub items: Vec<OrderItemInput>,
    pub table_id: Option<i64>,
    pub observations: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Session {
    user: CurrentUser,
    items: Vec<OrderItemInput>,
    table: Option<DiningTable>,
    observations: String,
}

impl Session {
    pub fn new(user: CurrentUser) -> Self {
        Self {
            user,
            items: Vec::new(),
            table: None,
            observations: String::new(),
        }
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    pub fn items(&self) -> &[OrderItemInput] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_table(&self) -> Option<&DiningTable> {
        self.table.as_ref()
    }

    pub fn observations(&self) -> &str {
        &self.observations
    }

    /// Add one unit of a product
    ///
    /// A product already in the draft gets its quantity incremented instead
    /// of a second line.
    pub fn add_product(&mut self, product: &Product, flags: &FeatureFlags) -> Result<(), ManagerError> {
        if !product.is_available {
            return Err(ManagerError::ProductUnavailable(product.name.clone()));
        }
        if flags.table_required() && self.table.is_none() {
            return Err(ManagerError::NoTableSelected);
        }

        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            if line.quantity >= MAX_QUANTITY {
                return Err(ManagerError::InvalidItem(format!(
                    "Quantity of '{}' cannot exceed {MAX_QUANTITY}",
                    line.product_name
                )));
            }
            line.quantity += 1;
        } else {
            self.items.push(OrderItemInput {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity: 1,
                unit_price: money::round_price(product.price),
                note: None,
            });
        }
        Ok(())
    }

    /// Take one unit off a line, dropping the line when it reaches zero
    pub fn remove_one(&mut self, index: usize) -> Result<(), ManagerError> {
        let line = self
            .items
            .get_mut(index)
            .ok_or(ManagerError::LineNotFound(index))?;
        if line.quantity > 1 {
            line.quantity -= 1;
        } else {
            self.items.remove(index);
        }
        Ok(())
    }

    /// Set or clear (empty / `None`) the note of a line
    pub fn set_note(&mut self, index: usize, note: Option<String>) -> Result<(), ManagerError> {
        let note = normalize_optional(note);
        if let Some(text) = &note
            && text.chars().count() > MAX_NOTE_LEN
        {
            return Err(ManagerError::InvalidItem(format!(
                "Note is too long (max {MAX_NOTE_LEN} characters)"
            )));
        }
        let line = self
            .items
            .get_mut(index)
            .ok_or(ManagerError::LineNotFound(index))?;
        line.note = note;
        Ok(())
    }

    pub fn select_table(&mut self, table: DiningTable) {
        self.table = Some(table);
    }

    pub fn clear_table(&mut self) {
        self.table = None;
    }

    pub fn set_observations(&mut self, text: impl Into<String>) {
        self.observations = text.into();
    }

    /// Drop every draft line
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> f64 {
        money::order_total(&self.items)
    }

    /// Number of units in the draft
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity as i64).sum()
    }

    /// Snapshot of the draft for submission
    pub fn to_request(&self) -> SubmitRequest {
        SubmitRequest {
            items: self.items.clone(),
            table_id: self.table.as_ref().map(|t| t.id),
            observations: normalize_optional(Some(self.observations.clone())),
        }
    }

    /// Reset after a successful submission
    pub(crate) fn finish_submission(&mut self) {
        self.items.clear();
        self.observations.clear();
        self.table = None;
    }
}
