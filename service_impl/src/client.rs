use crate::gen_service_impl;
use async_trait::async_trait;
use dao::{client::ClientDao, TransactionDao};
use service::{
    client::{Client, ClientIdentity, ClientService},
    clock::ClockService,
    uuid_service::UuidService,
    ServiceError,
};
use tracing::debug;
use uuid::Uuid;

const CLIENT_SERVICE_PROCESS: &str = "client-service";

gen_service_impl! {
    struct ClientServiceImpl: ClientService = ClientServiceDeps {
        ClientDao: ClientDao<Transaction = Self::Transaction> = client_dao,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

#[async_trait]
impl<Deps: ClientServiceDeps> ClientService for ClientServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    async fn get(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Client, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let client = self
            .client_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|client| client.business_id == business_id && client.deleted.is_none())
            .as_ref()
            .map(Client::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(client)
    }

    async fn resolve(
        &self,
        business_id: Uuid,
        identity: &ClientIdentity,
        tx: Option<Self::Transaction>,
    ) -> Result<Client, ServiceError> {
        let identity = identity.normalized();
        if identity.email.is_none() && identity.phone.is_none() {
            return Err(ServiceError::invalid_value("client"));
        }
        let tx = self.transaction_dao.use_transaction(tx).await?;

        let existing = self
            .client_dao
            .find_by_contact(
                business_id,
                identity.email.clone(),
                identity.phone.clone(),
                tx.clone(),
            )
            .await?;

        let client = match existing.as_ref().map(Client::from) {
            Some(client) => {
                let merged = Client {
                    name: if identity.name.is_empty() {
                        client.name.clone()
                    } else {
                        identity.name.clone()
                    },
                    email: identity.email.clone().or(client.email.clone()),
                    phone: identity.phone.clone().or(client.phone.clone()),
                    ..client.clone()
                };
                if merged == client {
                    client
                } else {
                    debug!("Merging contact data into client {}", client.id);
                    let merged = Client {
                        version: self.uuid_service.new_uuid("client-version"),
                        ..merged
                    };
                    self.client_dao
                        .update(&(&merged).try_into()?, CLIENT_SERVICE_PROCESS, tx.clone())
                        .await?;
                    merged
                }
            }
            None => {
                if identity.name.is_empty() {
                    return Err(ServiceError::invalid_value("name"));
                }
                let client = Client {
                    id: self.uuid_service.new_uuid("client-id"),
                    business_id,
                    name: identity.name.clone(),
                    email: identity.email.clone(),
                    phone: identity.phone.clone(),
                    created: Some(self.clock_service.date_time_now()),
                    deleted: None,
                    version: self.uuid_service.new_uuid("client-version"),
                };
                self.client_dao
                    .create(&(&client).try_into()?, CLIENT_SERVICE_PROCESS, tx.clone())
                    .await?;
                client
            }
        };

        self.transaction_dao.commit(tx).await?;
        Ok(client)
    }
}
