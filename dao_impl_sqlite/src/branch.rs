use std::sync::Arc;

use crate::{
    format_date_time, format_optional_date_time, parse_date_time, parse_optional_date_time,
    parse_uuid, ResultDbErrorExt, TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    branch::{BranchDao, BranchEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

pub struct BranchDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl BranchDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[derive(sqlx::FromRow)]
struct BranchDb {
    id: Vec<u8>,
    business_id: Vec<u8>,
    name: String,
    timezone: String,
    is_main: bool,
    active: bool,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&BranchDb> for BranchEntity {
    type Error = DaoError;
    fn try_from(branch: &BranchDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&branch.id)?,
            business_id: parse_uuid(&branch.business_id)?,
            name: branch.name.as_str().into(),
            timezone: branch.timezone.as_str().into(),
            is_main: branch.is_main,
            active: branch.active,
            created: parse_date_time(&branch.created)?,
            deleted: parse_optional_date_time(&branch.deleted)?,
            version: parse_uuid(&branch.update_version)?,
        })
    }
}

const BRANCH_COLUMNS: &str =
    "id, business_id, name, timezone, is_main, active, created, deleted, update_version";

#[async_trait]
impl BranchDao for BranchDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<BranchEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        let row = query_as::<_, BranchDb>(&format!("SELECT {BRANCH_COLUMNS} FROM branch WHERE id = ?"))
            .bind(id_vec)
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        row.as_ref()
            .map(BranchEntity::try_from)
            .transpose()
    }

    async fn find_by_business_id(
        &self,
        business_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[BranchEntity]>, DaoError> {
        let business_id_vec = business_id.as_bytes().to_vec();
        let rows = query_as::<_, BranchDb>(&format!(
            "SELECT {BRANCH_COLUMNS} FROM branch WHERE business_id = ? AND deleted IS NULL ORDER BY created, id"
        ))
        .bind(business_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        rows.iter()
            .map(BranchEntity::try_from)
            .collect::<Result<Arc<[BranchEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &BranchEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "INSERT INTO branch (id, business_id, name, timezone, is_main, active, created, deleted, update_version, update_process) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.business_id.as_bytes().to_vec())
        .bind(entity.name.as_ref())
        .bind(entity.timezone.as_ref())
        .bind(entity.is_main)
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
        entity: &BranchEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "UPDATE branch SET name = ?, timezone = ?, is_main = ?, active = ?, deleted = ?, update_version = ?, update_process = ? \
             WHERE id = ?",
        )
        .bind(entity.name.as_ref())
        .bind(entity.timezone.as_ref())
        .bind(entity.is_main)
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
