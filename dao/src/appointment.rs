use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    PendingPayment,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}
impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::NoShow => "NO_SHOW",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DaoError> {
        match value {
            "PENDING_PAYMENT" => Ok(Self::PendingPayment),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            "COMPLETED" => Ok(Self::Completed),
            "NO_SHOW" => Ok(Self::NoShow),
            _ => Err(DaoError::EnumValueNotFound(value.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Local,
    Online,
}
impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Online => "ONLINE",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DaoError> {
        match value {
            "LOCAL" => Ok(Self::Local),
            "ONLINE" => Ok(Self::Online),
            _ => Err(DaoError::EnumValueNotFound(value.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppointmentEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub branch_id: Uuid,
    pub client_id: Uuid,
    pub offering_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
    pub status: AppointmentStatus,
    pub payment_method: PaymentMethod,
    pub price_cents: i64,
    pub notes: Option<Arc<str>>,
    pub checkout_handle: Option<Arc<str>>,
    pub cancellation_reason: Option<Arc<str>>,
    pub created: PrimitiveDateTime,
    pub version: Uuid,
}

/// The booking ledger.
///
/// "Active" always means `PENDING_PAYMENT` or `CONFIRMED`.
#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait AppointmentDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AppointmentEntity>, DaoError>;
    /// Active appointments of a branch intersecting `[from, to)`, ordered by start.
    async fn find_active_by_branch_in_range(
        &self,
        branch_id: Uuid,
        from: PrimitiveDateTime,
        to: PrimitiveDateTime,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError>;
    /// Active appointments of the professional overlapping `[from, to)`.
    async fn find_active_overlapping(
        &self,
        professional_id: Uuid,
        from: PrimitiveDateTime,
        to: PrimitiveDateTime,
        exclude_id: Option<Uuid>,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError>;
    async fn find_pending_payment_created_before(
        &self,
        created_before: PrimitiveDateTime,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
