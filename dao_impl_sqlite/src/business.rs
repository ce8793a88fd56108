use std::sync::Arc;

use crate::{parse_optional_date_time, parse_uuid, ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    business::{BusinessDao, BusinessEntity},
    DaoError,
};
use sqlx::query_as;
use uuid::Uuid;

pub struct BusinessDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl BusinessDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[derive(sqlx::FromRow)]
struct BusinessDb {
    id: Vec<u8>,
    name: String,
    slot_granularity_minutes: i64,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&BusinessDb> for BusinessEntity {
    type Error = DaoError;
    fn try_from(business: &BusinessDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&business.id)?,
            name: business.name.as_str().into(),
            slot_granularity_minutes: u16::try_from(business.slot_granularity_minutes)
                .map_err(|err| DaoError::DatabaseQueryError(Box::new(err)))?,
            deleted: parse_optional_date_time(&business.deleted)?,
            version: parse_uuid(&business.update_version)?,
        })
    }
}

#[async_trait]
impl BusinessDao for BusinessDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<BusinessEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        let row = query_as::<_, BusinessDb>(
            "SELECT id, name, slot_granularity_minutes, deleted, update_version FROM business WHERE id = ?",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        row.as_ref()
            .map(BusinessEntity::try_from)
            .transpose()
    }
}
