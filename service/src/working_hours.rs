use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::{PrimitiveDateTime, Time};
use uuid::Uuid;

use crate::{DayOfWeek, ServiceError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingHours {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub from: Time,
    pub to: Time,
    pub active: bool,
    pub created: Option<PrimitiveDateTime>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::working_hours::WorkingHoursEntity> for WorkingHours {
    fn from(working_hours: &dao::working_hours::WorkingHoursEntity) -> Self {
        Self {
            id: working_hours.id,
            professional_id: working_hours.professional_id,
            day_of_week: working_hours.day_of_week,
            from: working_hours.from,
            to: working_hours.to,
            active: working_hours.active,
            created: Some(working_hours.created),
            deleted: working_hours.deleted,
            version: working_hours.version,
        }
    }
}

impl TryFrom<&WorkingHours> for dao::working_hours::WorkingHoursEntity {
    type Error = ServiceError;
    fn try_from(working_hours: &WorkingHours) -> Result<Self, Self::Error> {
        Ok(Self {
            id: working_hours.id,
            professional_id: working_hours.professional_id,
            day_of_week: working_hours.day_of_week,
            from: working_hours.from,
            to: working_hours.to,
            active: working_hours.active,
            created: working_hours.created.ok_or(ServiceError::InternalError)?,
            deleted: working_hours.deleted,
            version: working_hours.version,
        })
    }
}

/// Time of day range a professional works on one weekday.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkingWindow {
    pub from: Time,
    pub to: Time,
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait WorkingHoursService {
    type Transaction: dao::Transaction;

    /// `None` when the professional does not work on that weekday.
    async fn active_window_for(
        &self,
        professional_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<WorkingWindow>, ServiceError>;

    async fn get_for_professional(
        &self,
        business_id: Uuid,
        professional_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[WorkingHours]>, ServiceError>;

    /// An active row replaces the previously active row of the same weekday.
    async fn create(
        &self,
        business_id: Uuid,
        working_hours: &WorkingHours,
        tx: Option<Self::Transaction>,
    ) -> Result<WorkingHours, ServiceError>;

    async fn update(
        &self,
        business_id: Uuid,
        working_hours: &WorkingHours,
        tx: Option<Self::Transaction>,
    ) -> Result<WorkingHours, ServiceError>;

    async fn delete(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
