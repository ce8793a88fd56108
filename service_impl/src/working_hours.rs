use std::sync::Arc;

use crate::gen_service_impl;
use async_trait::async_trait;
use dao::{
    professional::ProfessionalDao,
    working_hours::{WorkingHoursDao, WorkingHoursEntity},
    TransactionDao,
};
use service::{
    clock::ClockService,
    uuid_service::UuidService,
    working_hours::{WorkingHours, WorkingHoursService, WorkingWindow},
    DayOfWeek, ServiceError, ValidationFailureItem,
};
use tracing::info;
use uuid::Uuid;

const WORKING_HOURS_SERVICE_PROCESS: &str = "working-hours-service";

gen_service_impl! {
    struct WorkingHoursServiceImpl: WorkingHoursService = WorkingHoursServiceDeps {
        WorkingHoursDao: WorkingHoursDao<Transaction = Self::Transaction> = working_hours_dao,
        ProfessionalDao: ProfessionalDao<Transaction = Self::Transaction> = professional_dao,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

impl<Deps: WorkingHoursServiceDeps> WorkingHoursServiceImpl<Deps> {
    async fn ensure_professional(
        &self,
        business_id: Uuid,
        professional_id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        self.professional_dao
            .find_by_id(professional_id, tx)
            .await?
            .filter(|professional| {
                professional.business_id == business_id && professional.deleted.is_none()
            })
            .map(|_| ())
            .ok_or(ServiceError::EntityNotFound(professional_id))
    }

    /// Keeps at most one active row per professional and weekday.
    async fn deactivate_previous(
        &self,
        professional_id: Uuid,
        day_of_week: DayOfWeek,
        keep: Uuid,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        if let Some(previous) = self
            .working_hours_dao
            .find_active_by_professional_and_day(professional_id, day_of_week, tx.clone())
            .await?
            .filter(|previous| previous.id != keep)
        {
            info!(
                "Deactivating working hours {} of professional {} on {}",
                previous.id, professional_id, day_of_week
            );
            let previous = WorkingHoursEntity {
                active: false,
                version: self.uuid_service.new_uuid("working-hours-version"),
                ..previous
            };
            self.working_hours_dao
                .update(&previous, WORKING_HOURS_SERVICE_PROCESS, tx)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<Deps: WorkingHoursServiceDeps> WorkingHoursService for WorkingHoursServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    async fn active_window_for(
        &self,
        professional_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<WorkingWindow>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let window = self
            .working_hours_dao
            .find_active_by_professional_and_day(professional_id, day_of_week, tx.clone())
            .await?
            .map(|working_hours| WorkingWindow {
                from: working_hours.from,
                to: working_hours.to,
            });
        self.transaction_dao.commit(tx).await?;
        Ok(window)
    }

    async fn get_for_professional(
        &self,
        business_id: Uuid,
        professional_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[WorkingHours]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.ensure_professional(business_id, professional_id, tx.clone())
            .await?;
        let working_hours = self
            .working_hours_dao
            .find_by_professional_id(professional_id, tx.clone())
            .await?
            .iter()
            .map(WorkingHours::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(working_hours)
    }

    async fn create(
        &self,
        business_id: Uuid,
        working_hours: &WorkingHours,
        tx: Option<Self::Transaction>,
    ) -> Result<WorkingHours, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        if working_hours.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if working_hours.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        if working_hours.deleted.is_some() {
            return Err(ServiceError::DeletedSetOnCreate);
        }
        if working_hours.from >= working_hours.to {
            return Err(ServiceError::TimeOrderWrong(
                working_hours.from,
                working_hours.to,
            ));
        }
        self.ensure_professional(business_id, working_hours.professional_id, tx.clone())
            .await?;

        let working_hours = WorkingHours {
            id: self.uuid_service.new_uuid("working-hours-id"),
            version: self.uuid_service.new_uuid("working-hours-version"),
            created: Some(self.clock_service.date_time_now()),
            ..working_hours.clone()
        };
        if working_hours.active {
            self.deactivate_previous(
                working_hours.professional_id,
                working_hours.day_of_week,
                working_hours.id,
                tx.clone(),
            )
            .await?;
        }
        self.working_hours_dao
            .create(
                &(&working_hours).try_into()?,
                WORKING_HOURS_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;

        self.transaction_dao.commit(tx).await?;
        Ok(working_hours)
    }

    async fn update(
        &self,
        business_id: Uuid,
        working_hours: &WorkingHours,
        tx: Option<Self::Transaction>,
    ) -> Result<WorkingHours, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let persisted = self
            .working_hours_dao
            .find_by_id(working_hours.id, tx.clone())
            .await?
            .filter(|persisted| persisted.deleted.is_none())
            .ok_or(ServiceError::EntityNotFound(working_hours.id))?;
        self.ensure_professional(business_id, persisted.professional_id, tx.clone())
            .await?;

        if working_hours.version != persisted.version {
            return Err(ServiceError::EntityConflicts(
                working_hours.id,
                persisted.version,
                working_hours.version,
            ));
        }
        let mut failures = Vec::new();
        if working_hours.professional_id != persisted.professional_id {
            failures.push(ValidationFailureItem::ModificationNotAllowed(
                "professional_id".into(),
            ));
        }
        if working_hours.deleted.is_some() {
            failures.push(ValidationFailureItem::ModificationNotAllowed(
                "deleted".into(),
            ));
        }
        if !failures.is_empty() {
            return Err(ServiceError::ValidationError(failures.into()));
        }
        if working_hours.from >= working_hours.to {
            return Err(ServiceError::TimeOrderWrong(
                working_hours.from,
                working_hours.to,
            ));
        }

        let working_hours = WorkingHours {
            version: self.uuid_service.new_uuid("working-hours-version"),
            created: Some(persisted.created),
            ..working_hours.clone()
        };
        if working_hours.active {
            self.deactivate_previous(
                working_hours.professional_id,
                working_hours.day_of_week,
                working_hours.id,
                tx.clone(),
            )
            .await?;
        }
        self.working_hours_dao
            .update(
                &(&working_hours).try_into()?,
                WORKING_HOURS_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;

        self.transaction_dao.commit(tx).await?;
        Ok(working_hours)
    }

    async fn delete(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let persisted = self
            .working_hours_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|persisted| persisted.deleted.is_none())
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.ensure_professional(business_id, persisted.professional_id, tx.clone())
            .await?;

        let deleted = WorkingHoursEntity {
            active: false,
            deleted: Some(self.clock_service.date_time_now()),
            version: self.uuid_service.new_uuid("working-hours-version"),
            ..persisted
        };
        self.working_hours_dao
            .update(&deleted, WORKING_HOURS_SERVICE_PROCESS, tx.clone())
            .await?;

        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
