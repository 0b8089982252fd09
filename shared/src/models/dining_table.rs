//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Occupancy state of a dining table
///
/// Stored as text. Rows are read back as raw strings so that a hand-edited
/// database never breaks the table board; use [`TableStatus::parse`] to
/// interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    OutOfService,
}

impl TableStatus {
    pub const ALL: [TableStatus; 4] = [
        TableStatus::Available,
        TableStatus::Occupied,
        TableStatus::Reserved,
        TableStatus::OutOfService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::OutOfService => "out_of_service",
        }
    }

    /// Lenient parse (case-insensitive, accepts `-` or space for `_`).
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|s| s.as_str() == normalized)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    /// Raw occupancy state, see [`TableStatus`]
    pub status: String,
    pub zone: String,
}

impl DiningTable {
    pub fn status(&self) -> Option<TableStatus> {
        TableStatus::parse(&self.status)
    }

    pub fn is_available(&self) -> bool {
        self.status() == Some(TableStatus::Available)
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub name: String,
    pub capacity: i32,
    pub zone: String,
    /// Defaults to `available`
    pub status: Option<TableStatus>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub zone: Option<String>,
    pub status: Option<TableStatus>,
}
