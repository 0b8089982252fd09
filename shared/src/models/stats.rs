//! Dashboard statistics

use serde::{Deserialize, Serialize};

/// Today's orders by state, plus active orders across all dates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStats {
    pub pending: i64,
    pub in_preparation: i64,
    pub completed: i64,
    pub cancelled: i64,
    /// Pending + in preparation, any date
    pub active_total: i64,
}

impl OrderStats {
    pub fn today_total(&self) -> i64 {
        self.pending + self.in_preparation + self.completed + self.cancelled
    }
}

/// Tables by occupancy state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub available: i64,
    pub occupied: i64,
    pub reserved: i64,
    pub out_of_service: i64,
    /// Unrecognized state strings
    pub other: i64,
}

impl TableStats {
    pub fn total(&self) -> i64 {
        self.available + self.occupied + self.reserved + self.out_of_service + self.other
    }
}
