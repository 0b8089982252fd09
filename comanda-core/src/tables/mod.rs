//! Dining tables
//!
//! - [`tracker`] - occupancy mutations driven by orders
//! - [`board`] - derived indicators and stats
//! - [`TableService`] - administration
//! - [`TableBoardRefresher`] - periodic board refresh worker

pub mod board;
pub mod refresh;
pub mod service;
pub mod tracker;

pub use board::{TableBoard, TableCard, TableIndicator};
pub use refresh::TableBoardRefresher;
pub use service::TableService;

use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table {0} not found")]
    NotFound(i64),

    #[error("Table {table_id} has {active} active orders")]
    HasActiveOrders { table_id: i64, active: i64 },

    #[error("Table {table_id} state cannot change while it has {active} active orders")]
    StateLocked { table_id: i64, active: i64 },

    #[error("A table named '{0}' already exists")]
    NameExists(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        let message = err.to_string();
        match err {
            TableError::NotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, message).with_detail("table_id", id)
            }
            TableError::HasActiveOrders { table_id, active } => {
                AppError::with_message(ErrorCode::TableHasOrders, message)
                    .with_detail("table_id", table_id)
                    .with_detail("active_orders", active)
            }
            TableError::StateLocked { table_id, active } => {
                AppError::with_message(ErrorCode::TableStateLocked, message)
                    .with_detail("table_id", table_id)
                    .with_detail("active_orders", active)
            }
            TableError::NameExists(name) => {
                AppError::with_message(ErrorCode::TableNameExists, message).with_detail("name", name)
            }
            TableError::Repo(e) => e.into(),
        }
    }
}
