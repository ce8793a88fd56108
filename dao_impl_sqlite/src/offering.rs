use std::sync::Arc;

use crate::{parse_optional_date_time, parse_uuid, ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    offering::{OfferingBranchEntity, OfferingDao, OfferingEntity},
    DaoError,
};
use sqlx::query_as;
use uuid::Uuid;

pub struct OfferingDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl OfferingDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[derive(sqlx::FromRow)]
struct OfferingDb {
    id: Vec<u8>,
    business_id: Vec<u8>,
    name: String,
    duration_minutes: i64,
    price_cents: i64,
    global: bool,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&OfferingDb> for OfferingEntity {
    type Error = DaoError;
    fn try_from(offering: &OfferingDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&offering.id)?,
            business_id: parse_uuid(&offering.business_id)?,
            name: offering.name.as_str().into(),
            duration_minutes: u16::try_from(offering.duration_minutes)
                .map_err(|err| DaoError::DatabaseQueryError(Box::new(err)))?,
            price_cents: offering.price_cents,
            global: offering.global,
            deleted: parse_optional_date_time(&offering.deleted)?,
            version: parse_uuid(&offering.update_version)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OfferingBranchDb {
    offering_id: Vec<u8>,
    branch_id: Vec<u8>,
    price_cents: Option<i64>,
}
impl TryFrom<&OfferingBranchDb> for OfferingBranchEntity {
    type Error = DaoError;
    fn try_from(assignment: &OfferingBranchDb) -> Result<Self, Self::Error> {
        Ok(Self {
            offering_id: parse_uuid(&assignment.offering_id)?,
            branch_id: parse_uuid(&assignment.branch_id)?,
            price_cents: assignment.price_cents,
        })
    }
}

#[async_trait]
impl OfferingDao for OfferingDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<OfferingEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        let row = query_as::<_, OfferingDb>(
            "SELECT id, business_id, name, duration_minutes, price_cents, global, deleted, update_version FROM offering WHERE id = ?",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        row.as_ref()
            .map(OfferingEntity::try_from)
            .transpose()
    }

    async fn find_branch_assignment(
        &self,
        offering_id: Uuid,
        branch_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<OfferingBranchEntity>, DaoError> {
        let offering_id_vec = offering_id.as_bytes().to_vec();
        let branch_id_vec = branch_id.as_bytes().to_vec();
        let row = query_as::<_, OfferingBranchDb>(
            "SELECT offering_id, branch_id, price_cents FROM offering_branch WHERE offering_id = ? AND branch_id = ?",
        )
        .bind(offering_id_vec)
        .bind(branch_id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        row.as_ref()
            .map(OfferingBranchEntity::try_from)
            .transpose()
    }
}
