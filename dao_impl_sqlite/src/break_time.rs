use std::sync::Arc;

use crate::{
    format_date_time, format_optional_date_time, format_time, parse_date_time,
    parse_day_of_week, parse_optional_date_time, parse_time, parse_uuid, ResultDbErrorExt,
    TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    break_time::{BreakTimeDao, BreakTimeEntity},
    DaoError, DayOfWeek,
};
use sqlx::{query, query_as};
use uuid::Uuid;

pub struct BreakTimeDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl BreakTimeDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[derive(sqlx::FromRow)]
struct BreakTimeDb {
    id: Vec<u8>,
    branch_id: Vec<u8>,
    day_of_week: i64,
    time_from: String,
    time_to: String,
    label: String,
    active: bool,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&BreakTimeDb> for BreakTimeEntity {
    type Error = DaoError;
    fn try_from(break_time: &BreakTimeDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&break_time.id)?,
            branch_id: parse_uuid(&break_time.branch_id)?,
            day_of_week: parse_day_of_week(break_time.day_of_week)?,
            from: parse_time(&break_time.time_from)?,
            to: parse_time(&break_time.time_to)?,
            label: break_time.label.as_str().into(),
            active: break_time.active,
            created: parse_date_time(&break_time.created)?,
            deleted: parse_optional_date_time(&break_time.deleted)?,
            version: parse_uuid(&break_time.update_version)?,
        })
    }
}

const BREAK_TIME_COLUMNS: &str = "id, branch_id, day_of_week, time_from, time_to, label, active, created, deleted, update_version";

#[async_trait]
impl BreakTimeDao for BreakTimeDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<BreakTimeEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        let row = query_as::<_, BreakTimeDb>(&format!(
            "SELECT {BREAK_TIME_COLUMNS} FROM break_time WHERE id = ?"
        ))
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        row.as_ref().map(BreakTimeEntity::try_from).transpose()
    }

    async fn find_by_branch_id(
        &self,
        branch_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[BreakTimeEntity]>, DaoError> {
        let branch_id_vec = branch_id.as_bytes().to_vec();
        let rows = query_as::<_, BreakTimeDb>(&format!(
            "SELECT {BREAK_TIME_COLUMNS} FROM break_time WHERE branch_id = ? AND deleted IS NULL \
             ORDER BY day_of_week, time_from"
        ))
        .bind(branch_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        rows.iter()
            .map(BreakTimeEntity::try_from)
            .collect::<Result<Arc<[BreakTimeEntity]>, DaoError>>()
    }

    async fn find_active_by_branch_and_day(
        &self,
        branch_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Self::Transaction,
    ) -> Result<Arc<[BreakTimeEntity]>, DaoError> {
        let branch_id_vec = branch_id.as_bytes().to_vec();
        let rows = query_as::<_, BreakTimeDb>(&format!(
            "SELECT {BREAK_TIME_COLUMNS} FROM break_time \
             WHERE branch_id = ? AND day_of_week = ? AND active = 1 AND deleted IS NULL \
             ORDER BY time_from"
        ))
        .bind(branch_id_vec)
        .bind(day_of_week.to_number() as i64)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        rows.iter()
            .map(BreakTimeEntity::try_from)
            .collect::<Result<Arc<[BreakTimeEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &BreakTimeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "INSERT INTO break_time (id, branch_id, day_of_week, time_from, time_to, label, active, created, deleted, update_version, update_process) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.branch_id.as_bytes().to_vec())
        .bind(entity.day_of_week.to_number() as i64)
        .bind(format_time(&entity.from)?)
        .bind(format_time(&entity.to)?)
        .bind(entity.label.as_ref())
        .bind(entity.active)
        .bind(format_date_time(&entity.created)?)
        .bind(format_optional_date_time(&entity.deleted)?)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &BreakTimeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "UPDATE break_time SET day_of_week = ?, time_from = ?, time_to = ?, label = ?, active = ?, deleted = ?, update_version = ?, update_process = ? \
             WHERE id = ?",
        )
        .bind(entity.day_of_week.to_number() as i64)
        .bind(format_time(&entity.from)?)
        .bind(format_time(&entity.to)?)
        .bind(entity.label.as_ref())
        .bind(entity.active)
        .bind(format_optional_date_time(&entity.deleted)?)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .bind(entity.id.as_bytes().to_vec())
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }
}
