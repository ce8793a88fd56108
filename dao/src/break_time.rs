use crate::{DaoError, DayOfWeek};
use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;
use time::{PrimitiveDateTime, Time};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakTimeEntity {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub from: Time,
    pub to: Time,
    pub label: Arc<str>,
    pub active: bool,
    pub created: PrimitiveDateTime,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait BreakTimeDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<BreakTimeEntity>, DaoError>;
    async fn find_by_branch_id(
        &self,
        branch_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[BreakTimeEntity]>, DaoError>;
    /// Ordered by start time.
    async fn find_active_by_branch_and_day(
        &self,
        branch_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Self::Transaction,
    ) -> Result<Arc<[BreakTimeEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &BreakTimeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &BreakTimeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
