//! Order workflow errors

use crate::db::repository::RepoError;
use crate::tables::TableError;
use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("The order has no items")]
    EmptyOrder,

    #[error("A table must be selected before ordering")]
    NoTableSelected,

    #[error("Product '{0}' is not available")]
    ProductUnavailable(String),

    #[error("Draft line {0} does not exist")]
    LineNotFound(usize),

    #[error("Invalid order item: {0}")]
    InvalidItem(String),

    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Order {0} is already cancelled")]
    AlreadyCancelled(String),

    #[error("Order {0} is completed and cannot be cancelled")]
    CannotCancelCompleted(String),

    #[error("Order {order_number} cannot go from {from} to {to}")]
    InvalidTransition {
        order_number: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Order {order_number} is still {status}; releasing its table needs confirmation")]
    ConfirmationRequired {
        order_number: String,
        status: OrderStatus,
    },

    #[error("Order {0} is not linked to a table")]
    OrderHasNoTable(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<sqlx::Error> for ManagerError {
    fn from(err: sqlx::Error) -> Self {
        ManagerError::Repo(err.into())
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        let message = err.to_string();
        match err {
            ManagerError::EmptyOrder => AppError::with_message(ErrorCode::OrderEmpty, message),
            ManagerError::NoTableSelected => AppError::with_message(ErrorCode::NoTableSelected, message),
            ManagerError::ProductUnavailable(name) => {
                AppError::with_message(ErrorCode::ProductUnavailable, message).with_detail("product", name)
            }
            ManagerError::LineNotFound(index) => {
                AppError::with_message(ErrorCode::InvalidRequest, message).with_detail("index", index)
            }
            ManagerError::InvalidItem(_) => AppError::validation(message),
            ManagerError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, message).with_detail("order_id", id)
            }
            ManagerError::AlreadyCancelled(number) => {
                AppError::with_message(ErrorCode::OrderAlreadyCancelled, message)
                    .with_detail("order_number", number)
            }
            ManagerError::CannotCancelCompleted(number) => {
                AppError::with_message(ErrorCode::OrderCannotCancelCompleted, message)
                    .with_detail("order_number", number)
            }
            ManagerError::InvalidTransition { order_number, from, to } => {
                AppError::with_message(ErrorCode::OrderInvalidTransition, message)
                    .with_detail("order_number", order_number)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            ManagerError::ConfirmationRequired { order_number, status } => {
                AppError::with_message(ErrorCode::ConfirmationRequired, message)
                    .with_detail("order_number", order_number)
                    .with_detail("status", status.as_str())
            }
            ManagerError::OrderHasNoTable(number) => {
                AppError::with_message(ErrorCode::OrderHasNoTable, message)
                    .with_detail("order_number", number)
            }
            ManagerError::Table(e) => e.into(),
            ManagerError::Repo(e) => e.into(),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
