use std::sync::Arc;

use async_trait::async_trait;
use dao::{DaoError, DayOfWeek, Transaction};
use sqlx::SqlitePool;
use time::{macros::format_description, PrimitiveDateTime, Time};
use tokio::sync::Mutex;
use uuid::Uuid;

pub mod appointment;
pub mod branch;
pub mod break_time;
pub mod business;
pub mod client;
pub mod offering;
pub mod professional;
pub mod working_hours;

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Message raised by the appointment overlap triggers of the schema.
const APPOINTMENT_OVERLAP_GUARD: &str = "appointment_overlap";

pub trait ResultDbErrorExt<T> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T> ResultDbErrorExt<T> for Result<T, sqlx::Error> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(classify_db_error)
    }
}

fn classify_db_error(err: sqlx::Error) -> DaoError {
    let (overlap, contention) = match &err {
        sqlx::Error::Database(db_err) => (
            db_err.message().contains(APPOINTMENT_OVERLAP_GUARD),
            db_err
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                // Extended result codes keep the primary code in the low byte.
                .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)),
        ),
        _ => (false, false),
    };
    if overlap {
        DaoError::AppointmentOverlap
    } else if contention {
        tracing::debug!("Database contention: {}", err);
        DaoError::Contention(Box::new(err))
    } else {
        DaoError::DatabaseQueryError(Box::new(err))
    }
}

pub(crate) fn format_date_time(date_time: &PrimitiveDateTime) -> Result<String, DaoError> {
    Ok(date_time.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second]"
    ))?)
}
pub(crate) fn parse_date_time(value: &str) -> Result<PrimitiveDateTime, DaoError> {
    Ok(PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )?)
}
pub(crate) fn format_optional_date_time(
    date_time: &Option<PrimitiveDateTime>,
) -> Result<Option<String>, DaoError> {
    date_time.as_ref().map(format_date_time).transpose()
}
pub(crate) fn parse_optional_date_time(
    value: &Option<String>,
) -> Result<Option<PrimitiveDateTime>, DaoError> {
    value.as_deref().map(parse_date_time).transpose()
}
pub(crate) fn format_time(time: &Time) -> Result<String, DaoError> {
    Ok(time.format(format_description!("[hour]:[minute]:[second]"))?)
}
pub(crate) fn parse_time(value: &str) -> Result<Time, DaoError> {
    Ok(Time::parse(
        value,
        format_description!("[hour]:[minute]:[second]"),
    )?)
}
pub(crate) fn parse_day_of_week(number: i64) -> Result<DayOfWeek, DaoError> {
    u8::try_from(number)
        .ok()
        .and_then(DayOfWeek::from_number)
        .ok_or(DaoError::InvalidDayOfWeek(
            number.clamp(0, u8::MAX as i64) as u8
        ))
}
pub(crate) fn parse_uuid(bytes: &[u8]) -> Result<Uuid, DaoError> {
    Ok(Uuid::from_slice(bytes)?)
}
pub(crate) fn parse_optional_uuid(bytes: &Option<Vec<u8>>) -> Result<Option<Uuid>, DaoError> {
    bytes.as_deref().map(parse_uuid).transpose()
}

#[derive(Clone, Debug)]
pub struct TransactionImpl {
    pub tx: Arc<Mutex<sqlx::Transaction<'static, sqlx::Sqlite>>>,
}

impl Transaction for TransactionImpl {}

pub struct TransactionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl TransactionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::TransactionDao for TransactionDaoImpl {
    type Transaction = TransactionImpl;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError> {
        let tx = self.pool.begin().await.map_db_error()?;
        Ok(TransactionImpl {
            tx: Arc::new(tx.into()),
        })
    }

    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError> {
        match tx {
            Some(tx) => Ok(tx),
            None => self.new_transaction().await,
        }
    }

    /// Only the last holder of a transaction commits it.
    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError> {
        if let Some(tx) = Arc::into_inner(transaction.tx) {
            tx.into_inner().commit().await.map_db_error()?;
        }
        Ok(())
    }
}
