use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Client {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: Arc<str>,
    pub email: Option<Arc<str>>,
    pub phone: Option<Arc<str>>,
    pub created: Option<PrimitiveDateTime>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::client::ClientEntity> for Client {
    fn from(client: &dao::client::ClientEntity) -> Self {
        Self {
            id: client.id,
            business_id: client.business_id,
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            created: Some(client.created),
            deleted: client.deleted,
            version: client.version,
        }
    }
}

impl TryFrom<&Client> for dao::client::ClientEntity {
    type Error = ServiceError;
    fn try_from(client: &Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: client.id,
            business_id: client.business_id,
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            created: client.created.ok_or(ServiceError::InternalError)?,
            deleted: client.deleted,
            version: client.version,
        })
    }
}

/// Contact data supplied with a booking request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientIdentity {
    pub name: Arc<str>,
    pub email: Option<Arc<str>>,
    pub phone: Option<Arc<str>>,
}

impl ClientIdentity {
    /// Email and phone with blank values removed.
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<Arc<str>>) -> Option<Arc<str>> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(Arc::from)
        }
        Self {
            name: self.name.trim().into(),
            email: clean(&self.email),
            phone: clean(&self.phone),
        }
    }
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait ClientService {
    type Transaction: dao::Transaction;

    async fn get(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Client, ServiceError>;

    /// Finds the client of the business by email or phone and merges the
    /// supplied fields into it, or creates a new client.
    async fn resolve(
        &self,
        business_id: Uuid,
        identity: &ClientIdentity,
        tx: Option<Self::Transaction>,
    ) -> Result<Client, ServiceError>;
}
