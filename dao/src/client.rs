use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: Arc<str>,
    pub email: Option<Arc<str>>,
    pub phone: Option<Arc<str>>,
    pub created: PrimitiveDateTime,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ClientDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ClientEntity>, DaoError>;
    /// First client of the business matching the email or the phone number.
    async fn find_by_contact(
        &self,
        business_id: Uuid,
        email: Option<Arc<str>>,
        phone: Option<Arc<str>>,
        tx: Self::Transaction,
    ) -> Result<Option<ClientEntity>, DaoError>;
    async fn create(
        &self,
        entity: &ClientEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &ClientEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
