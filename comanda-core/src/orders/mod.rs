//! Orders (comandas)
//!
//! - [`Session`] - draft assembly for the current user
//! - [`OrdersManager`] - submit / prepare / complete / cancel with table reconciliation
//! - [`sequencer`] - daily `ORD-YYYYMMDD-NN` numbers
//! - [`events`] - change notifications for the table board

pub mod events;
pub mod manager;
pub mod money;
pub mod sequencer;
pub mod session;

pub use events::{OrderChange, OrderChangeKind};
pub use manager::{CancelOutcome, CompleteOutcome, ManagerError, ManagerResult, OrdersManager, SubmitOutcome};
pub use session::{Session, SubmitRequest};
