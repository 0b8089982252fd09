//! Shared types for the Comanda order system
//!
//! Data models and the unified error system used by `comanda-core`
//! and any presentation layer that sits on top of it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
