//! Table board refresh worker
//!
//! Re-reads the board every `TABLE_REFRESH_SECS` (when `auto_refresh_tables` is
//! on) and right after every order change. A failed read is logged and retried
//! after `TABLE_REFRESH_RETRY_SECS`; the previous board stays published.

use super::TableService;
use super::board::TableBoard;
use crate::orders::events::OrderChange;
use crate::settings::{SettingsService, keys};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

pub struct TableBoardRefresher {
    tables: TableService,
    settings: SettingsService,
    interval: Duration,
    retry: Duration,
    changes: Option<broadcast::Receiver<OrderChange>>,
    board_tx: watch::Sender<Arc<TableBoard>>,
}

/// Why a refresh ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Timer,
    OrderChange,
}

impl TableBoardRefresher {
    pub fn new(
        tables: TableService,
        settings: SettingsService,
        changes: broadcast::Receiver<OrderChange>,
        interval: Duration,
        retry: Duration,
    ) -> Self {
        let (board_tx, _) = watch::channel(Arc::new(TableBoard::default()));
        Self {
            tables,
            settings,
            interval,
            retry,
            changes: Some(changes),
            board_tx,
        }
    }

    /// Latest published board
    pub fn subscribe(&self) -> watch::Receiver<Arc<TableBoard>> {
        self.board_tx.subscribe()
    }

    /// Read the board once and publish it
    pub async fn refresh(&self) -> bool {
        match self.tables.board().await {
            Ok(board) => {
                tracing::trace!(tables = board.cards.len(), "Table board refreshed");
                self.board_tx.send_replace(Arc::new(board));
                true
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    retry_in_secs = self.retry.as_secs(),
                    "Table board refresh failed"
                );
                false
            }
        }
    }

    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            retry_secs = self.retry.as_secs(),
            "Table board refresher started"
        );

        let mut delay = self.step(Trigger::OrderChange).await;
        loop {
            let trigger = tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => Trigger::Timer,
                change = recv_change(&mut self.changes) => match change {
                    Ok(_) => Trigger::OrderChange,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Refresher lagged behind order changes");
                        Trigger::OrderChange
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        self.changes = None;
                        continue;
                    }
                },
            };
            delay = self.step(trigger).await;
        }

        tracing::info!("Table board refresher stopped");
    }

    /// Run one refresh, returning the delay until the next timer refresh
    async fn step(&self, trigger: Trigger) -> Duration {
        if trigger == Trigger::Timer && !self.settings.get_bool(keys::AUTO_REFRESH_TABLES) {
            return self.interval;
        }
        if self.refresh().await {
            self.interval
        } else {
            self.retry
        }
    }
}

async fn recv_change(
    changes: &mut Option<broadcast::Receiver<OrderChange>>,
) -> Result<OrderChange, broadcast::error::RecvError> {
    match changes {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CurrentUser;
    use crate::db::DbService;
    use crate::orders::events::OrderChangeKind;
    use shared::models::{DiningTableCreate, OrderStatus};

    async fn setup() -> (TableBoardRefresher, TableService, broadcast::Sender<OrderChange>) {
        let db = DbService::in_memory().await.unwrap();
        let settings = SettingsService::load(db.pool.clone()).await.unwrap();
        let tables = TableService::new(db.pool.clone());
        let (tx, rx) = broadcast::channel(16);
        let refresher = TableBoardRefresher::new(
            tables.clone(),
            settings,
            rx,
            Duration::from_secs(3600),
            Duration::from_secs(3600),
        );
        (refresher, tables, tx)
    }

    #[tokio::test]
    async fn test_refresh_publishes_board() {
        let (refresher, tables, _tx) = setup().await;
        tables
            .create(
                &CurrentUser::temporary_admin(),
                DiningTableCreate {
                    name: "T1".into(),
                    capacity: 4,
                    zone: "Main".into(),
                    status: None,
                },
            )
            .await
            .unwrap();

        let rx = refresher.subscribe();
        assert!(rx.borrow().cards.is_empty());
        assert!(refresher.refresh().await);
        assert_eq!(rx.borrow().cards.len(), 1);
    }

    #[tokio::test]
    async fn test_order_change_triggers_refresh() {
        let (refresher, tables, tx) = setup().await;
        let mut rx = refresher.subscribe();
        let shutdown = CancellationToken::new();
        let worker = tokio::spawn(refresher.run(shutdown.clone()));

        // Initial refresh on start
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();

        tables
            .create(
                &CurrentUser::temporary_admin(),
                DiningTableCreate {
                    name: "T1".into(),
                    capacity: 4,
                    zone: "Main".into(),
                    status: None,
                },
            )
            .await
            .unwrap();
        tx.send(OrderChange {
            kind: OrderChangeKind::Submitted,
            order_id: 1,
            order_number: "ORD-20240115-01".into(),
            table_id: None,
            status: OrderStatus::Pending,
            table_released: false,
            timestamp: 0,
        })
        .unwrap();

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rx.borrow().cards.len(), 1);

        shutdown.cancel();
        worker.await.unwrap();
    }
}
