//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod config;
pub mod dining_table;
pub mod order;
pub mod product;
pub mod stats;
pub mod user;

// Re-exports
pub use config::*;
pub use dining_table::*;
pub use order::*;
pub use product::*;
pub use stats::*;
pub use user::*;
