//! Table board - derived occupancy view
//!
//! The indicator is computed from the stored state plus order counts and is
//! never written back.

use crate::db::repository::dining_table::TableOccupancyRow;
use serde::{Deserialize, Serialize};
use shared::models::{TableStats, TableStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableIndicator {
    /// available, nothing in flight
    Free,
    /// available but orders are still open (manual release while serving)
    FreeWithPendingOrders,
    /// occupied, every order finished: waiting for manual release
    ReadyToRelease,
    /// occupied with open orders
    InService,
    /// reserved, out of service, unknown states, or occupied with no orders at all
    Other,
}

impl TableIndicator {
    pub fn classify(status: &str, active_orders: i64, completed_orders: i64) -> Self {
        match (TableStatus::parse(status), active_orders, completed_orders) {
            (Some(TableStatus::Available), 0, _) => TableIndicator::Free,
            (Some(TableStatus::Available), _, _) => TableIndicator::FreeWithPendingOrders,
            (Some(TableStatus::Occupied), 0, c) if c > 0 => TableIndicator::ReadyToRelease,
            (Some(TableStatus::Occupied), a, _) if a > 0 => TableIndicator::InService,
            _ => TableIndicator::Other,
        }
    }
}

/// One table on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCard {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub zone: String,
    pub status: String,
    pub active_orders: i64,
    pub completed_orders: i64,
    pub indicator: TableIndicator,
}

impl From<TableOccupancyRow> for TableCard {
    fn from(row: TableOccupancyRow) -> Self {
        let indicator =
            TableIndicator::classify(&row.status, row.active_orders, row.completed_orders);
        Self {
            id: row.id,
            name: row.name,
            capacity: row.capacity,
            zone: row.zone,
            status: row.status,
            active_orders: row.active_orders,
            completed_orders: row.completed_orders,
            indicator,
        }
    }
}

/// Snapshot of every table plus per-state counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBoard {
    pub cards: Vec<TableCard>,
    pub stats: TableStats,
    pub refreshed_at: i64,
}

impl TableBoard {
    pub fn from_rows(rows: Vec<TableOccupancyRow>, refreshed_at: i64) -> Self {
        let cards: Vec<TableCard> = rows.into_iter().map(TableCard::from).collect();
        let stats = stats_from_statuses(cards.iter().map(|c| (c.status.as_str(), 1)));
        Self {
            cards,
            stats,
            refreshed_at,
        }
    }

    pub fn card(&self, table_id: i64) -> Option<&TableCard> {
        self.cards.iter().find(|c| c.id == table_id)
    }
}

/// Fold `(raw status, count)` pairs into [`TableStats`]
pub fn stats_from_statuses<'a>(counts: impl IntoIterator<Item = (&'a str, i64)>) -> TableStats {
    let mut stats = TableStats::default();
    for (status, count) in counts {
        match TableStatus::parse(status) {
            Some(TableStatus::Available) => stats.available += count,
            Some(TableStatus::Occupied) => stats.occupied += count,
            Some(TableStatus::Reserved) => stats.reserved += count,
            Some(TableStatus::OutOfService) => stats.out_of_service += count,
            None => stats.other += count,
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        use TableIndicator::*;
        assert_eq!(TableIndicator::classify("available", 0, 0), Free);
        assert_eq!(TableIndicator::classify("available", 0, 3), Free);
        assert_eq!(TableIndicator::classify("available", 2, 0), FreeWithPendingOrders);
        assert_eq!(TableIndicator::classify("occupied", 0, 1), ReadyToRelease);
        assert_eq!(TableIndicator::classify("occupied", 1, 0), InService);
        assert_eq!(TableIndicator::classify("occupied", 2, 5), InService);
        assert_eq!(TableIndicator::classify("occupied", 0, 0), Other);
        assert_eq!(TableIndicator::classify("reserved", 0, 0), Other);
        assert_eq!(TableIndicator::classify("out_of_service", 1, 0), Other);
    }

    #[test]
    fn test_unknown_state_is_other() {
        assert_eq!(TableIndicator::classify("", 0, 0), TableIndicator::Other);
        assert_eq!(TableIndicator::classify("Ocupada", 1, 0), TableIndicator::Other);
        assert_eq!(TableIndicator::classify("OCCUPIED", 1, 0), TableIndicator::InService);
    }

    #[test]
    fn test_board_stats() {
        let row = |id, status: &str| TableOccupancyRow {
            id,
            name: format!("Table {id}"),
            capacity: 4,
            status: status.to_string(),
            zone: "Main".to_string(),
            active_orders: 0,
            completed_orders: 0,
        };
        let board = TableBoard::from_rows(
            vec![row(1, "available"), row(2, "occupied"), row(3, "broken"), row(4, "available")],
            0,
        );
        assert_eq!(board.stats.available, 2);
        assert_eq!(board.stats.occupied, 1);
        assert_eq!(board.stats.other, 1);
        assert_eq!(board.stats.total(), 4);
        assert_eq!(board.card(3).unwrap().indicator, TableIndicator::Other);
    }
}
