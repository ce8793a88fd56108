use std::sync::Arc;

use crate::{
    format_date_time, parse_date_time, parse_optional_uuid, parse_uuid, ResultDbErrorExt,
    TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    appointment::{AppointmentDao, AppointmentEntity, AppointmentStatus, PaymentMethod},
    DaoError,
};
use sqlx::{query, query_as};
use time::PrimitiveDateTime;
use uuid::Uuid;

pub struct AppointmentDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl AppointmentDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[derive(sqlx::FromRow)]
struct AppointmentDb {
    id: Vec<u8>,
    business_id: Vec<u8>,
    branch_id: Vec<u8>,
    client_id: Vec<u8>,
    offering_id: Vec<u8>,
    professional_id: Option<Vec<u8>>,
    start_time: String,
    end_time: String,
    status: String,
    payment_method: String,
    price_cents: i64,
    notes: Option<String>,
    checkout_handle: Option<String>,
    cancellation_reason: Option<String>,
    created: String,
    update_version: Vec<u8>,
}
impl TryFrom<&AppointmentDb> for AppointmentEntity {
    type Error = DaoError;
    fn try_from(appointment: &AppointmentDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&appointment.id)?,
            business_id: parse_uuid(&appointment.business_id)?,
            branch_id: parse_uuid(&appointment.branch_id)?,
            client_id: parse_uuid(&appointment.client_id)?,
            offering_id: parse_uuid(&appointment.offering_id)?,
            professional_id: parse_optional_uuid(&appointment.professional_id)?,
            start_time: parse_date_time(&appointment.start_time)?,
            end_time: parse_date_time(&appointment.end_time)?,
            status: AppointmentStatus::parse(&appointment.status)?,
            payment_method: PaymentMethod::parse(&appointment.payment_method)?,
            price_cents: appointment.price_cents,
            notes: appointment.notes.as_deref().map(Arc::from),
            checkout_handle: appointment.checkout_handle.as_deref().map(Arc::from),
            cancellation_reason: appointment.cancellation_reason.as_deref().map(Arc::from),
            created: parse_date_time(&appointment.created)?,
            version: parse_uuid(&appointment.update_version)?,
        })
    }
}

const APPOINTMENT_COLUMNS: &str = "id, business_id, branch_id, client_id, offering_id, professional_id, \
     start_time, end_time, status, payment_method, price_cents, notes, checkout_handle, \
     cancellation_reason, created, update_version";

#[async_trait]
impl AppointmentDao for AppointmentDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AppointmentEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        let row = query_as::<_, AppointmentDb>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment WHERE id = ?"
        ))
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        row.as_ref().map(AppointmentEntity::try_from).transpose()
    }

    async fn find_active_by_branch_in_range(
        &self,
        branch_id: Uuid,
        from: PrimitiveDateTime,
        to: PrimitiveDateTime,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError> {
        let branch_id_vec = branch_id.as_bytes().to_vec();
        let rows = query_as::<_, AppointmentDb>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment \
             WHERE branch_id = ? AND status IN ('PENDING_PAYMENT', 'CONFIRMED') \
             AND start_time < ? AND ? < end_time \
             ORDER BY start_time, id"
        ))
        .bind(branch_id_vec)
        .bind(format_date_time(&to)?)
        .bind(format_date_time(&from)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        rows.iter()
            .map(AppointmentEntity::try_from)
            .collect::<Result<Arc<[AppointmentEntity]>, DaoError>>()
    }

    async fn find_active_overlapping(
        &self,
        professional_id: Uuid,
        from: PrimitiveDateTime,
        to: PrimitiveDateTime,
        exclude_id: Option<Uuid>,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError> {
        let professional_id_vec = professional_id.as_bytes().to_vec();
        let exclude_id_vec = exclude_id.map(|id| id.as_bytes().to_vec());
        let rows = query_as::<_, AppointmentDb>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment \
             WHERE professional_id = ? AND status IN ('PENDING_PAYMENT', 'CONFIRMED') \
             AND start_time < ? AND ? < end_time \
             AND (? IS NULL OR id <> ?) \
             ORDER BY start_time, id"
        ))
        .bind(professional_id_vec)
        .bind(format_date_time(&to)?)
        .bind(format_date_time(&from)?)
        .bind(exclude_id_vec.clone())
        .bind(exclude_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        rows.iter()
            .map(AppointmentEntity::try_from)
            .collect::<Result<Arc<[AppointmentEntity]>, DaoError>>()
    }

    async fn find_pending_payment_created_before(
        &self,
        created_before: PrimitiveDateTime,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError> {
        let rows = query_as::<_, AppointmentDb>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment \
             WHERE status = 'PENDING_PAYMENT' AND created < ? \
             ORDER BY created, id"
        ))
        .bind(format_date_time(&created_before)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        rows.iter()
            .map(AppointmentEntity::try_from)
            .collect::<Result<Arc<[AppointmentEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "INSERT INTO appointment (id, business_id, branch_id, client_id, offering_id, professional_id, \
             start_time, end_time, status, payment_method, price_cents, notes, checkout_handle, \
             cancellation_reason, created, update_version, update_process) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.business_id.as_bytes().to_vec())
        .bind(entity.branch_id.as_bytes().to_vec())
        .bind(entity.client_id.as_bytes().to_vec())
        .bind(entity.offering_id.as_bytes().to_vec())
        .bind(entity.professional_id.map(|id| id.as_bytes().to_vec()))
        .bind(format_date_time(&entity.start_time)?)
        .bind(format_date_time(&entity.end_time)?)
        .bind(entity.status.as_str())
        .bind(entity.payment_method.as_str())
        .bind(entity.price_cents)
        .bind(entity.notes.as_deref())
        .bind(entity.checkout_handle.as_deref())
        .bind(entity.cancellation_reason.as_deref())
        .bind(format_date_time(&entity.created)?)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "UPDATE appointment SET client_id = ?, offering_id = ?, professional_id = ?, start_time = ?, end_time = ?, \
             status = ?, payment_method = ?, price_cents = ?, notes = ?, checkout_handle = ?, \
             cancellation_reason = ?, update_version = ?, update_process = ? \
             WHERE id = ?",
        )
        .bind(entity.client_id.as_bytes().to_vec())
        .bind(entity.offering_id.as_bytes().to_vec())
        .bind(entity.professional_id.map(|id| id.as_bytes().to_vec()))
        .bind(format_date_time(&entity.start_time)?)
        .bind(format_date_time(&entity.end_time)?)
        .bind(entity.status.as_str())
        .bind(entity.payment_method.as_str())
        .bind(entity.price_cents)
        .bind(entity.notes.as_deref())
        .bind(entity.checkout_handle.as_deref())
        .bind(entity.cancellation_reason.as_deref())
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .bind(entity.id.as_bytes().to_vec())
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }
}
