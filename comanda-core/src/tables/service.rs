//! Table administration and board queries

use super::TableError;
use super::board::{TableBoard, stats_from_statuses};
use super::tracker;
use crate::auth::{CurrentUser, permissions};
use crate::db::repository::{RepoError, dining_table as table_repo};
use crate::utils::validation::{MAX_NAME_LEN, validate_capacity, validate_required_text};
use shared::error::AppResult;
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStats};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct TableService {
    pool: SqlitePool,
}

impl TableService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<DiningTable>> {
        Ok(table_repo::find_all(&self.pool).await?)
    }

    /// Tables that can be picked for a new order
    pub async fn list_available(&self) -> AppResult<Vec<DiningTable>> {
        Ok(table_repo::find_available(&self.pool).await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<DiningTable> {
        Ok(table_repo::find_by_id(&self.pool, id)
            .await?
            .ok_or(TableError::NotFound(id))?)
    }

    pub async fn board(&self) -> AppResult<TableBoard> {
        let rows = table_repo::find_occupancy(&self.pool).await?;
        Ok(TableBoard::from_rows(rows, shared::util::now_millis()))
    }

    pub async fn stats(&self) -> AppResult<TableStats> {
        let counts = table_repo::count_by_status(&self.pool).await?;
        Ok(stats_from_statuses(
            counts.iter().map(|(status, count)| (status.as_str(), *count)),
        ))
    }

    pub async fn create(&self, actor: &CurrentUser, mut data: DiningTableCreate) -> AppResult<DiningTable> {
        actor.require_permission(permissions::TABLES_MANAGE)?;

        data.name = data.name.trim().to_string();
        data.zone = data.zone.trim().to_string();
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&data.zone, "zone", MAX_NAME_LEN)?;
        validate_capacity(data.capacity)?;

        if table_repo::name_taken(&self.pool, &data.name, None).await? {
            return Err(TableError::NameExists(data.name).into());
        }

        let name = data.name.clone();
        let table = table_repo::create(&self.pool, data)
            .await
            .map_err(|e| duplicate_as_name_exists(e, &name))?;
        crate::audit_log!(actor.username, "table.create", format!("table:{}", table.id), table.name);
        Ok(table)
    }

    /// Edit a table; its state cannot change while it has active orders
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: i64,
        mut data: DiningTableUpdate,
    ) -> AppResult<DiningTable> {
        actor.require_permission(permissions::TABLES_MANAGE)?;

        let existing = self.get(id).await?;

        if let Some(name) = &mut data.name {
            *name = name.trim().to_string();
            validate_required_text(name, "name", MAX_NAME_LEN)?;
            if table_repo::name_taken(&self.pool, name, Some(id)).await? {
                return Err(TableError::NameExists(name.clone()).into());
            }
        }
        if let Some(zone) = &mut data.zone {
            *zone = zone.trim().to_string();
            validate_required_text(zone, "zone", MAX_NAME_LEN)?;
        }
        if let Some(capacity) = data.capacity {
            validate_capacity(capacity)?;
        }
        if let Some(status) = data.status
            && existing.status() != Some(status)
        {
            let active = table_repo::count_active_orders(&self.pool, id).await?;
            if active > 0 {
                return Err(TableError::StateLocked { table_id: id, active }.into());
            }
        }

        let name = data.name.clone().unwrap_or_default();
        let table = table_repo::update(&self.pool, id, data)
            .await
            .map_err(|e| duplicate_as_name_exists(e, &name))?;
        crate::audit_log!(actor.username, "table.update", format!("table:{id}"), table.name);
        Ok(table)
    }

    /// Delete a table with no active orders
    pub async fn delete(&self, actor: &CurrentUser, id: i64) -> AppResult<()> {
        actor.require_permission(permissions::TABLES_MANAGE)?;

        tracker::delete_guarded(&self.pool, id).await?;
        crate::audit_log!(actor.username, "table.delete", format!("table:{id}"));
        Ok(())
    }
}

fn duplicate_as_name_exists(err: RepoError, name: &str) -> shared::error::AppError {
    match err {
        RepoError::Duplicate(_) => TableError::NameExists(name.to_string()).into(),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::tables::board::TableIndicator;
    use shared::error::ErrorCode;
    use shared::models::{Role, TableStatus};

    async fn service() -> (TableService, SqlitePool) {
        let db = DbService::in_memory().await.unwrap();
        (TableService::new(db.pool.clone()), db.pool)
    }

    fn create_data(name: &str, capacity: i32) -> DiningTableCreate {
        DiningTableCreate {
            name: name.to_string(),
            capacity,
            zone: "Terrace".to_string(),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (tables, _) = service().await;
        let admin = CurrentUser::temporary_admin();

        let err = tables.create(&admin, create_data("T1", 0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableInvalidCapacity);

        tables.create(&admin, create_data("T1", 4)).await.unwrap();
        let err = tables
            .create(&admin, create_data(" T1 ", 2))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNameExists);

        let server = CurrentUser::new(Some(3), "ana", "Ana", Role::Server);
        let err = tables.create(&server, create_data("T2", 2)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
    }

    #[tokio::test]
    async fn test_state_locked_while_active_orders() {
        let (tables, pool) = service().await;
        let admin = CurrentUser::temporary_admin();
        let t = tables.create(&admin, create_data("T1", 4)).await.unwrap();
        sqlx::query(
            "INSERT INTO orders (order_number, table_id, created_by, created_at, total) VALUES ('ORD-20240115-01', ?, 'Ana', 0, 0)",
        )
        .bind(t.id)
        .execute(&pool)
        .await
        .unwrap();

        let err = tables
            .update(
                &admin,
                t.id,
                DiningTableUpdate {
                    status: Some(TableStatus::Reserved),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableStateLocked);

        // Other fields stay editable
        let updated = tables
            .update(
                &admin,
                t.id,
                DiningTableUpdate {
                    capacity: Some(6),
                    status: Some(TableStatus::Available),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.capacity, 6);

        let err = tables.delete(&admin, t.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableHasOrders);
    }

    #[tokio::test]
    async fn test_board_and_stats() {
        let (tables, _) = service().await;
        let admin = CurrentUser::temporary_admin();
        tables.create(&admin, create_data("T1", 4)).await.unwrap();
        let mut reserved = create_data("T2", 2);
        reserved.status = Some(TableStatus::Reserved);
        tables.create(&admin, reserved).await.unwrap();

        let board = tables.board().await.unwrap();
        assert_eq!(board.cards.len(), 2);
        assert_eq!(board.cards[0].indicator, TableIndicator::Free);
        assert_eq!(board.cards[1].indicator, TableIndicator::Other);

        let stats = tables.stats().await.unwrap();
        assert_eq!(stats.available, 1);
        assert_eq!(stats.reserved, 1);
        assert_eq!(stats, board.stats);
    }
}
