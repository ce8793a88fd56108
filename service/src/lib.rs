use std::sync::Arc;

use thiserror::Error;
use time::Time;
use uuid::Uuid;

pub mod appointment;
pub mod availability;
pub mod booking;
pub mod branch;
pub mod break_time;
pub mod client;
pub mod clock;
pub mod config;
pub mod notification;
pub mod offering;
pub mod outbox;
pub mod payment_gateway;
pub mod payment_validation;
pub mod professional;
pub mod scheduler;
pub mod uuid_service;
pub mod working_hours;

pub use agendo_utils::{DayOfWeek, TimeRange};

use appointment::AppointmentStatus;
use payment_validation::ScoringSummary;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ValidationFailureItem {
    ModificationNotAllowed(Arc<str>),
    InvalidValue(Arc<str>),
}

/// Coarse classification of [`ServiceError`] used by callers that only care
/// about the category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ValidationError,
    SlotConflict,
    NoProfessionalAvailable,
    PaymentRequired,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::SlotConflict => "SLOT_CONFLICT",
            ErrorKind::NoProfessionalAvailable => "NO_PROFESSIONAL_AVAILABLE",
            ErrorKind::PaymentRequired => "PAYMENT_REQUIRED",
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Entity {0} not found")]
    EntityNotFound(Uuid),

    #[error("Validation error: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),

    #[error("Time order wrong: {0} must be before {1}")]
    TimeOrderWrong(Time, Time),

    #[error("Time range overlaps an existing one")]
    OverlappingTimeRange,

    #[error("Status transition from {0} to {1} is not allowed")]
    InvalidStatusTransition(AppointmentStatus, AppointmentStatus),

    #[error("ID cannot be set on create")]
    IdSetOnCreate,

    #[error("Version cannot be set on create")]
    VersionSetOnCreate,

    #[error("Deleted cannot be set on create")]
    DeletedSetOnCreate,

    #[error("Entity {0} conflicts, expected version {1} but got {2}")]
    EntityConflicts(Uuid, Uuid, Uuid),

    #[error("Time slot {0} is not available")]
    SlotConflict(TimeRange),

    #[error("No professional available for the requested time")]
    NoProfessionalAvailable,

    #[error("Online payment required: {}", .0.reason)]
    PaymentRequired(ScoringSummary),

    #[error("Operation timed out")]
    Timeout,

    #[error("Collaborator {0} failed: {1}")]
    CollaboratorError(&'static str, Arc<str>),

    #[error("Internal error")]
    InternalError,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::EntityNotFound(_) => ErrorKind::NotFound,
            ServiceError::ValidationError(_)
            | ServiceError::TimeOrderWrong(_, _)
            | ServiceError::OverlappingTimeRange
            | ServiceError::InvalidStatusTransition(_, _)
            | ServiceError::IdSetOnCreate
            | ServiceError::VersionSetOnCreate
            | ServiceError::DeletedSetOnCreate
            | ServiceError::EntityConflicts(_, _, _) => ErrorKind::ValidationError,
            ServiceError::SlotConflict(_) => ErrorKind::SlotConflict,
            ServiceError::NoProfessionalAvailable => ErrorKind::NoProfessionalAvailable,
            ServiceError::PaymentRequired(_) => ErrorKind::PaymentRequired,
            ServiceError::DatabaseQueryError(_)
            | ServiceError::Timeout
            | ServiceError::CollaboratorError(_, _)
            | ServiceError::InternalError => ErrorKind::InternalError,
        }
    }

    pub fn invalid_value(field: &str) -> Self {
        ServiceError::ValidationError([ValidationFailureItem::InvalidValue(field.into())].into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, time};

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            ServiceError::EntityNotFound(Uuid::nil()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ServiceError::TimeOrderWrong(time!(10:00), time!(09:00)).kind(),
            ErrorKind::ValidationError
        );
        assert_eq!(
            ServiceError::InvalidStatusTransition(
                AppointmentStatus::Cancelled,
                AppointmentStatus::Confirmed
            )
            .kind(),
            ErrorKind::ValidationError
        );
        assert_eq!(
            ServiceError::SlotConflict(TimeRange::new(
                datetime!(2024-01-15 10:00),
                datetime!(2024-01-15 10:30)
            ))
            .kind(),
            ErrorKind::SlotConflict
        );
        assert_eq!(
            ServiceError::NoProfessionalAvailable.kind(),
            ErrorKind::NoProfessionalAvailable
        );
        assert_eq!(ServiceError::Timeout.kind(), ErrorKind::InternalError);
        assert_eq!(
            ServiceError::DatabaseQueryError(dao::DaoError::AppointmentOverlap).kind(),
            ErrorKind::InternalError
        );
    }
}
