use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: Arc<str>,
    pub timezone: Arc<str>,
    pub is_main: bool,
    pub active: bool,
    pub created: PrimitiveDateTime,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait BranchDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<BranchEntity>, DaoError>;
    /// Non deleted branches of a business, oldest first.
    async fn find_by_business_id(
        &self,
        business_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[BranchEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &BranchEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &BranchEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
