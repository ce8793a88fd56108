use std::fmt::Debug;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod appointment;
pub mod branch;
pub mod break_time;
pub mod business;
pub mod client;
pub mod offering;
pub mod professional;
pub mod working_hours;

pub use agendo_utils::DayOfWeek;

#[derive(Error, Debug)]
pub enum DaoError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Uuid error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Date/Time parse error: {0}")]
    DateTimeParseError(#[from] time::error::Parse),

    #[error("Date/Time format error: {0}")]
    DateTimeFormatError(#[from] time::error::Format),

    #[error("Invalid day of week number: {0}")]
    InvalidDayOfWeek(u8),

    #[error("Enum value not found: {0}")]
    EnumValueNotFound(String),

    #[error("Appointment overlaps an active appointment of the same professional")]
    AppointmentOverlap,

    #[error("Database is busy: {0}")]
    Contention(Box<dyn std::error::Error + Send + Sync>),
}

pub trait Transaction: Clone + Debug + Send + Sync + 'static {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockTransaction;
impl Transaction for MockTransaction {}

/// Every write of the engine happens inside a transaction handed out here.
///
/// Dropping a transaction without committing it rolls it back.
#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait TransactionDao {
    type Transaction: Transaction;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError>;
    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError>;
    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError>;
}
