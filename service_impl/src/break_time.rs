use std::sync::Arc;

use crate::gen_service_impl;
use agendo_utils::TimeRange;
use async_trait::async_trait;
use dao::{
    branch::BranchDao,
    break_time::{BreakTimeDao, BreakTimeEntity},
    TransactionDao,
};
use service::{
    break_time::{BreakTime, BreakTimeService},
    clock::ClockService,
    uuid_service::UuidService,
    DayOfWeek, ServiceError, ValidationFailureItem,
};
use time::{macros::date, Date, Time};
use uuid::Uuid;

const BREAK_TIME_SERVICE_PROCESS: &str = "break-time-service";

/// Breaks are times of day; overlap checks place them on one common date.
const REFERENCE_DATE: Date = date!(2000 - 01 - 01);

fn day_range(from: Time, to: Time) -> TimeRange {
    TimeRange::on_date(REFERENCE_DATE, from, to)
}

gen_service_impl! {
    struct BreakTimeServiceImpl: BreakTimeService = BreakTimeServiceDeps {
        BreakTimeDao: BreakTimeDao<Transaction = Self::Transaction> = break_time_dao,
        BranchDao: BranchDao<Transaction = Self::Transaction> = branch_dao,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

impl<Deps: BreakTimeServiceDeps> BreakTimeServiceImpl<Deps> {
    async fn ensure_branch(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        self.branch_dao
            .find_by_id(branch_id, tx)
            .await?
            .filter(|branch| branch.business_id == business_id && branch.deleted.is_none())
            .map(|_| ())
            .ok_or(ServiceError::EntityNotFound(branch_id))
    }

    async fn ensure_no_overlap(
        &self,
        break_time: &BreakTime,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        if !break_time.active {
            return Ok(());
        }
        let range = day_range(break_time.from, break_time.to);
        let overlapping = self
            .break_time_dao
            .find_active_by_branch_and_day(break_time.branch_id, break_time.day_of_week, tx)
            .await?
            .iter()
            .filter(|other| other.id != break_time.id)
            .any(|other| range.overlaps(&day_range(other.from, other.to)));
        if overlapping {
            Err(ServiceError::OverlappingTimeRange)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl<Deps: BreakTimeServiceDeps> BreakTimeService for BreakTimeServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    async fn active_breaks_for(
        &self,
        branch_id: Uuid,
        day_of_week: DayOfWeek,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[BreakTime]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let mut breaks: Vec<BreakTime> = self
            .break_time_dao
            .find_active_by_branch_and_day(branch_id, day_of_week, tx.clone())
            .await?
            .iter()
            .filter(|break_time| break_time.active && break_time.deleted.is_none())
            .map(BreakTime::from)
            .collect();
        breaks.sort_by_key(|break_time| break_time.from);
        self.transaction_dao.commit(tx).await?;
        Ok(breaks.into())
    }

    async fn get_for_branch(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[BreakTime]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.ensure_branch(business_id, branch_id, tx.clone())
            .await?;
        let breaks = self
            .break_time_dao
            .find_by_branch_id(branch_id, tx.clone())
            .await?
            .iter()
            .map(BreakTime::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(breaks)
    }

    async fn create(
        &self,
        business_id: Uuid,
        break_time: &BreakTime,
        tx: Option<Self::Transaction>,
    ) -> Result<BreakTime, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        if break_time.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if break_time.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        if break_time.deleted.is_some() {
            return Err(ServiceError::DeletedSetOnCreate);
        }
        if break_time.from >= break_time.to {
            return Err(ServiceError::TimeOrderWrong(break_time.from, break_time.to));
        }
        self.ensure_branch(business_id, break_time.branch_id, tx.clone())
            .await?;
        self.ensure_no_overlap(break_time, tx.clone()).await?;

        let break_time = BreakTime {
            id: self.uuid_service.new_uuid("break-time-id"),
            version: self.uuid_service.new_uuid("break-time-version"),
            created: Some(self.clock_service.date_time_now()),
            ..break_time.clone()
        };
        self.break_time_dao
            .create(
                &(&break_time).try_into()?,
                BREAK_TIME_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;

        self.transaction_dao.commit(tx).await?;
        Ok(break_time)
    }

    async fn update(
        &self,
        business_id: Uuid,
        break_time: &BreakTime,
        tx: Option<Self::Transaction>,
    ) -> Result<BreakTime, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let persisted = self
            .break_time_dao
            .find_by_id(break_time.id, tx.clone())
            .await?
            .filter(|persisted| persisted.deleted.is_none())
            .ok_or(ServiceError::EntityNotFound(break_time.id))?;
        self.ensure_branch(business_id, persisted.branch_id, tx.clone())
            .await?;

        if break_time.version != persisted.version {
            return Err(ServiceError::EntityConflicts(
                break_time.id,
                persisted.version,
                break_time.version,
            ));
        }
        let mut failures = Vec::new();
        if break_time.branch_id != persisted.branch_id {
            failures.push(ValidationFailureItem::ModificationNotAllowed(
                "branch_id".into(),
            ));
        }
        if break_time.deleted.is_some() {
            failures.push(ValidationFailureItem::ModificationNotAllowed(
                "deleted".into(),
            ));
        }
        if !failures.is_empty() {
            return Err(ServiceError::ValidationError(failures.into()));
        }
        if break_time.from >= break_time.to {
            return Err(ServiceError::TimeOrderWrong(break_time.from, break_time.to));
        }
        self.ensure_no_overlap(break_time, tx.clone()).await?;

        let break_time = BreakTime {
            version: self.uuid_service.new_uuid("break-time-version"),
            created: Some(persisted.created),
            ..break_time.clone()
        };
        self.break_time_dao
            .update(
                &(&break_time).try_into()?,
                BREAK_TIME_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;

        self.transaction_dao.commit(tx).await?;
        Ok(break_time)
    }

    async fn delete(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let persisted = self
            .break_time_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|persisted| persisted.deleted.is_none())
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.ensure_branch(business_id, persisted.branch_id, tx.clone())
            .await?;

        let deleted = BreakTimeEntity {
            active: false,
            deleted: Some(self.clock_service.date_time_now()),
            version: self.uuid_service.new_uuid("break-time-version"),
            ..persisted
        };
        self.break_time_dao
            .update(&deleted, BREAK_TIME_SERVICE_PROCESS, tx.clone())
            .await?;

        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
