use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::{PrimitiveDateTime, Time};
use uuid::Uuid;

use crate::{DayOfWeek, ServiceError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakTime {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub from: Time,
    pub to: Time,
    pub label: Arc<str>,
    pub active: bool,
    pub created: Option<PrimitiveDateTime>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::break_time::BreakTimeEntity> for BreakTime {
    fn from(break_time: &dao::break_time::BreakTimeEntity) -> Self {
        Self {
            id: break_time.id,
            branch_id: break_time.branch_id,
            day_of_week: break_time.day_of_week,
            from: break_time.from,
            to: break_time.to,
            label: break_time.label.clone(),
            active: break_time.active,
            created: Some(break_time.created),
            deleted: break_time.deleted,
            version: break_time.version,
        }
    }
}

impl TryFrom<&BreakTime> for dao::break_time::BreakTimeEntity {
    type Error = ServiceError;
    fn try_from(break_time: &BreakTime) -> Result<Self, Self::Error> {
        Ok(Self {
            id: break_time.id,
            branch_id: break_time.branch_id,
            day_of_week: break_time.day_of_week,
            from: break_time.from,
            to: break_time.to,
            label: break_time.label.clone(),
            active: break_time.active,
            created: break_time.created.ok_or(ServiceError::InternalError)?,
            deleted: break_time.deleted,
            version: break_time.version,
        })
    }
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait BreakTimeService {
    type Transaction: dao::Transaction;

    /// Active breaks of the branch for the weekday, ordered by start.
    async fn active_breaks_for(
        &self,
        branch_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[BreakTime]>, ServiceError>;

    async fn get_for_branch(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[BreakTime]>, ServiceError>;

    async fn create(
        &self,
        business_id: Uuid,
        break_time: &BreakTime,
        tx: Option<Self::Transaction>,
    ) -> Result<BreakTime, ServiceError>;

    async fn update(
        &self,
        business_id: Uuid,
        break_time: &BreakTime,
        tx: Option<Self::Transaction>,
    ) -> Result<BreakTime, ServiceError>;

    async fn delete(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
