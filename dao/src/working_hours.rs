use crate::{DaoError, DayOfWeek};
use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;
use time::{PrimitiveDateTime, Time};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingHoursEntity {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub from: Time,
    pub to: Time,
    pub active: bool,
    pub created: PrimitiveDateTime,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait WorkingHoursDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<WorkingHoursEntity>, DaoError>;
    async fn find_by_professional_id(
        &self,
        professional_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[WorkingHoursEntity]>, DaoError>;
    async fn find_active_by_professional_and_day(
        &self,
        professional_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Self::Transaction,
    ) -> Result<Option<WorkingHoursEntity>, DaoError>;
    /// Active rows of all active professionals of the branch for one weekday.
    async fn find_active_by_branch_and_day(
        &self,
        branch_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Self::Transaction,
    ) -> Result<Arc<[WorkingHoursEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &WorkingHoursEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &WorkingHoursEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
