use std::sync::Arc;

use crate::{
    format_date_time, format_optional_date_time, parse_date_time, parse_optional_date_time,
    parse_uuid, ResultDbErrorExt, TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    client::{ClientDao, ClientEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

pub struct ClientDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ClientDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[derive(sqlx::FromRow)]
struct ClientDb {
    id: Vec<u8>,
    business_id: Vec<u8>,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&ClientDb> for ClientEntity {
    type Error = DaoError;
    fn try_from(client: &ClientDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&client.id)?,
            business_id: parse_uuid(&client.business_id)?,
            name: client.name.as_str().into(),
            email: client.email.as_deref().map(Arc::from),
            phone: client.phone.as_deref().map(Arc::from),
            created: parse_date_time(&client.created)?,
            deleted: parse_optional_date_time(&client.deleted)?,
            version: parse_uuid(&client.update_version)?,
        })
    }
}

const CLIENT_COLUMNS: &str =
    "id, business_id, name, email, phone, created, deleted, update_version";

#[async_trait]
impl ClientDao for ClientDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ClientEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        let row = query_as::<_, ClientDb>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM client WHERE id = ?"
        ))
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        row.as_ref().map(ClientEntity::try_from).transpose()
    }

    async fn find_by_contact(
        &self,
        business_id: Uuid,
        email: Option<Arc<str>>,
        phone: Option<Arc<str>>,
        tx: Self::Transaction,
    ) -> Result<Option<ClientEntity>, DaoError> {
        if email.is_none() && phone.is_none() {
            return Ok(None);
        }
        let business_id_vec = business_id.as_bytes().to_vec();
        let row = query_as::<_, ClientDb>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM client \
             WHERE business_id = ? AND deleted IS NULL \
             AND ((? IS NOT NULL AND email = ?) OR (? IS NOT NULL AND phone = ?)) \
             ORDER BY created, id LIMIT 1"
        ))
        .bind(business_id_vec)
        .bind(email.as_deref())
        .bind(email.as_deref())
        .bind(phone.as_deref())
        .bind(phone.as_deref())
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        row.as_ref().map(ClientEntity::try_from).transpose()
    }

    async fn create(
        &self,
        entity: &ClientEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "INSERT INTO client (id, business_id, name, email, phone, created, deleted, update_version, update_process) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.business_id.as_bytes().to_vec())
        .bind(entity.name.as_ref())
        .bind(entity.email.as_deref())
        .bind(entity.phone.as_deref())
        .bind(format_date_time(&entity.created)?)
        .bind(format_optional_date_time(&entity.deleted)?)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &ClientEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "UPDATE client SET name = ?, email = ?, phone = ?, deleted = ?, update_version = ?, update_process = ? \
             WHERE id = ?",
        )
        .bind(entity.name.as_ref())
        .bind(entity.email.as_deref())
        .bind(entity.phone.as_deref())
        .bind(format_optional_date_time(&entity.deleted)?)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .bind(entity.id.as_bytes().to_vec())
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }
}
