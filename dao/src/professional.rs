use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfessionalEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub branch_id: Uuid,
    pub name: Arc<str>,
    pub active: bool,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ProfessionalDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ProfessionalEntity>, DaoError>;
    /// Active, non deleted professionals of a branch ordered by name and id.
    async fn find_active_by_branch_id(
        &self,
        branch_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[ProfessionalEntity]>, DaoError>;
}
