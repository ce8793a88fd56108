use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OfferingEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: Arc<str>,
    pub duration_minutes: u16,
    pub price_cents: i64,
    pub global: bool,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OfferingBranchEntity {
    pub offering_id: Uuid,
    pub branch_id: Uuid,
    pub price_cents: Option<i64>,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait OfferingDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<OfferingEntity>, DaoError>;
    async fn find_branch_assignment(
        &self,
        offering_id: Uuid,
        branch_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<OfferingBranchEntity>, DaoError>;
}
