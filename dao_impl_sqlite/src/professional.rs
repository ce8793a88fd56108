use std::sync::Arc;

use crate::{parse_optional_date_time, parse_uuid, ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    professional::{ProfessionalDao, ProfessionalEntity},
    DaoError,
};
use sqlx::query_as;
use uuid::Uuid;

pub struct ProfessionalDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ProfessionalDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfessionalDb {
    id: Vec<u8>,
    business_id: Vec<u8>,
    branch_id: Vec<u8>,
    name: String,
    active: bool,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&ProfessionalDb> for ProfessionalEntity {
    type Error = DaoError;
    fn try_from(professional: &ProfessionalDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&professional.id)?,
            business_id: parse_uuid(&professional.business_id)?,
            branch_id: parse_uuid(&professional.branch_id)?,
            name: professional.name.as_str().into(),
            active: professional.active,
            deleted: parse_optional_date_time(&professional.deleted)?,
            version: parse_uuid(&professional.update_version)?,
        })
    }
}

#[async_trait]
impl ProfessionalDao for ProfessionalDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ProfessionalEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        let row = query_as::<_, ProfessionalDb>(
            "SELECT id, business_id, branch_id, name, active, deleted, update_version FROM professional WHERE id = ?",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        row.as_ref()
            .map(ProfessionalEntity::try_from)
            .transpose()
    }

    async fn find_active_by_branch_id(
        &self,
        branch_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[ProfessionalEntity]>, DaoError> {
        let branch_id_vec = branch_id.as_bytes().to_vec();
        let rows = query_as::<_, ProfessionalDb>(
            "SELECT id, business_id, branch_id, name, active, deleted, update_version FROM professional \
             WHERE branch_id = ? AND active = 1 AND deleted IS NULL ORDER BY name, id",
        )
        .bind(branch_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        rows.iter()
            .map(ProfessionalEntity::try_from)
            .collect::<Result<Arc<[ProfessionalEntity]>, DaoError>>()
    }
}
