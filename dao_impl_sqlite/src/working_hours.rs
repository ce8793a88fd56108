use std::sync::Arc;

use crate::{
    format_date_time, format_optional_date_time, format_time, parse_date_time,
    parse_day_of_week, parse_optional_date_time, parse_time, parse_uuid, ResultDbErrorExt,
    TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    working_hours::{WorkingHoursDao, WorkingHoursEntity},
    DaoError, DayOfWeek,
};
use sqlx::{query, query_as};
use uuid::Uuid;

pub struct WorkingHoursDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl WorkingHoursDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[derive(sqlx::FromRow)]
struct WorkingHoursDb {
    id: Vec<u8>,
    professional_id: Vec<u8>,
    day_of_week: i64,
    time_from: String,
    time_to: String,
    active: bool,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&WorkingHoursDb> for WorkingHoursEntity {
    type Error = DaoError;
    fn try_from(working_hours: &WorkingHoursDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&working_hours.id)?,
            professional_id: parse_uuid(&working_hours.professional_id)?,
            day_of_week: parse_day_of_week(working_hours.day_of_week)?,
            from: parse_time(&working_hours.time_from)?,
            to: parse_time(&working_hours.time_to)?,
            active: working_hours.active,
            created: parse_date_time(&working_hours.created)?,
            deleted: parse_optional_date_time(&working_hours.deleted)?,
            version: parse_uuid(&working_hours.update_version)?,
        })
    }
}

const WORKING_HOURS_COLUMNS: &str = "wh.id, wh.professional_id, wh.day_of_week, wh.time_from, wh.time_to, \
     wh.active, wh.created, wh.deleted, wh.update_version";

#[async_trait]
impl WorkingHoursDao for WorkingHoursDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<WorkingHoursEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        let row = query_as::<_, WorkingHoursDb>(&format!(
            "SELECT {WORKING_HOURS_COLUMNS} FROM working_hours wh WHERE wh.id = ?"
        ))
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        row.as_ref().map(WorkingHoursEntity::try_from).transpose()
    }

    async fn find_by_professional_id(
        &self,
        professional_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[WorkingHoursEntity]>, DaoError> {
        let professional_id_vec = professional_id.as_bytes().to_vec();
        let rows = query_as::<_, WorkingHoursDb>(&format!(
            "SELECT {WORKING_HOURS_COLUMNS} FROM working_hours wh \
             WHERE wh.professional_id = ? AND wh.deleted IS NULL \
             ORDER BY wh.day_of_week, wh.time_from"
        ))
        .bind(professional_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        rows.iter()
            .map(WorkingHoursEntity::try_from)
            .collect::<Result<Arc<[WorkingHoursEntity]>, DaoError>>()
    }

    async fn find_active_by_professional_and_day(
        &self,
        professional_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Self::Transaction,
    ) -> Result<Option<WorkingHoursEntity>, DaoError> {
        let professional_id_vec = professional_id.as_bytes().to_vec();
        let row = query_as::<_, WorkingHoursDb>(&format!(
            "SELECT {WORKING_HOURS_COLUMNS} FROM working_hours wh \
             WHERE wh.professional_id = ? AND wh.day_of_week = ? AND wh.active = 1 AND wh.deleted IS NULL \
             ORDER BY wh.created DESC LIMIT 1"
        ))
        .bind(professional_id_vec)
        .bind(day_of_week.to_number() as i64)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        row.as_ref().map(WorkingHoursEntity::try_from).transpose()
    }

    async fn find_active_by_branch_and_day(
        &self,
        branch_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Self::Transaction,
    ) -> Result<Arc<[WorkingHoursEntity]>, DaoError> {
        let branch_id_vec = branch_id.as_bytes().to_vec();
        let rows = query_as::<_, WorkingHoursDb>(&format!(
            "SELECT {WORKING_HOURS_COLUMNS} FROM working_hours wh \
             JOIN professional p ON p.id = wh.professional_id \
             WHERE p.branch_id = ? AND p.active = 1 AND p.deleted IS NULL \
             AND wh.day_of_week = ? AND wh.active = 1 AND wh.deleted IS NULL \
             ORDER BY p.name, p.id"
        ))
        .bind(branch_id_vec)
        .bind(day_of_week.to_number() as i64)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        rows.iter()
            .map(WorkingHoursEntity::try_from)
            .collect::<Result<Arc<[WorkingHoursEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &WorkingHoursEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "INSERT INTO working_hours (id, professional_id, day_of_week, time_from, time_to, active, created, deleted, update_version, update_process) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.professional_id.as_bytes().to_vec())
        .bind(entity.day_of_week.to_number() as i64)
        .bind(format_time(&entity.from)?)
        .bind(format_time(&entity.to)?)
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
        entity: &WorkingHoursEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "UPDATE working_hours SET day_of_week = ?, time_from = ?, time_to = ?, active = ?, deleted = ?, update_version = ?, update_process = ? \
             WHERE id = ?",
        )
        .bind(entity.day_of_week.to_number() as i64)
        .bind(format_time(&entity.from)?)
        .bind(format_time(&entity.to)?)
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
