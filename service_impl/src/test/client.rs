use std::sync::Arc;

use dao::client::{ClientEntity, MockClientDao};
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::eq;
use service::client::{ClientIdentity, ClientService};
use service::clock::MockClockService;
use service::uuid_service::MockUuidService;
use service::ValidationFailureItem;
use time::macros::datetime;
use uuid::{uuid, Uuid};

use crate::client::{ClientServiceDeps, ClientServiceImpl};
use crate::test::error_test::{test_not_found, test_validation_error};

pub fn default_business_id() -> Uuid {
    uuid!("6F700000-0000-4000-8000-000000000001")
}
pub fn default_id() -> Uuid {
    uuid!("6F700000-0000-4000-8000-000000000002")
}
pub fn default_version() -> Uuid {
    uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E50")
}
pub fn alternate_version() -> Uuid {
    uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E51")
}

fn default_client_entity() -> ClientEntity {
    ClientEntity {
        id: default_id(),
        business_id: default_business_id(),
        name: "Kim".into(),
        email: Some("kim@example.com".into()),
        phone: None,
        created: datetime!(2024-01-01 08:00),
        deleted: None,
        version: default_version(),
    }
}

struct ClientDependencies {
    client_dao: MockClientDao,
    clock_service: MockClockService,
    uuid_service: MockUuidService,
    transaction_dao: MockTransactionDao,
}

impl ClientServiceDeps for ClientDependencies {
    type Transaction = MockTransaction;
    type ClientDao = MockClientDao;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}

impl ClientDependencies {
    fn build_service(self) -> ClientServiceImpl<ClientDependencies> {
        ClientServiceImpl {
            client_dao: self.client_dao.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: self.transaction_dao.into(),
        }
    }
}

fn build_dependencies() -> ClientDependencies {
    let mut client_dao = MockClientDao::new();
    let mut clock_service = MockClockService::new();
    let mut uuid_service = MockUuidService::new();
    let mut transaction_dao = MockTransactionDao::new();

    client_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_client_entity())));
    client_dao
        .expect_find_by_contact()
        .returning(|_, _, _, _| Ok(Some(default_client_entity())));
    clock_service
        .expect_date_time_now()
        .returning(|| datetime!(2024-01-14 12:00));
    uuid_service.expect_new_uuid().returning(|usage| match usage {
        "client-id" => uuid!("6F700000-0000-4000-8000-0000000000AA"),
        _ => alternate_version(),
    });
    transaction_dao
        .expect_use_transaction()
        .returning(|_| Ok(MockTransaction));
    transaction_dao.expect_commit().returning(|_| Ok(()));

    ClientDependencies {
        client_dao,
        clock_service,
        uuid_service,
        transaction_dao,
    }
}

#[tokio::test]
async fn test_resolve_known_client_without_changes() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let client = service
        .resolve(
            default_business_id(),
            &ClientIdentity {
                name: "Kim".into(),
                email: Some(" kim@example.com ".into()),
                phone: Some("".into()),
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(client.id, default_id());
    assert_eq!(client.version, default_version());
}

#[tokio::test]
async fn test_resolve_merges_new_contact_data() {
    let mut deps = build_dependencies();
    deps.client_dao
        .expect_update()
        .withf(|entity, _, _| {
            entity.id == default_id()
                && entity.phone.as_deref() == Some("+49 170 1234567")
                && entity.email.as_deref() == Some("kim@example.com")
                && entity.version == alternate_version()
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let client = service
        .resolve(
            default_business_id(),
            &ClientIdentity {
                name: "".into(),
                email: Some("kim@example.com".into()),
                phone: Some("+49 170 1234567".into()),
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(client.name.as_ref(), "Kim");
}

#[tokio::test]
async fn test_resolve_creates_new_client() {
    let mut deps = build_dependencies();
    deps.client_dao.checkpoint();
    deps.client_dao
        .expect_find_by_contact()
        .with(
            eq(default_business_id()),
            eq(None::<Arc<str>>),
            eq(Some(Arc::<str>::from("+49 170 1234567"))),
            eq(MockTransaction),
        )
        .returning(|_, _, _, _| Ok(None));
    deps.client_dao
        .expect_create()
        .withf(|entity, _, _| {
            entity.id == uuid!("6F700000-0000-4000-8000-0000000000AA")
                && entity.name.as_ref() == "Robin"
                && entity.created == datetime!(2024-01-14 12:00)
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    service
        .resolve(
            default_business_id(),
            &ClientIdentity {
                name: "Robin".into(),
                email: None,
                phone: Some("+49 170 1234567".into()),
            },
            None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_resolve_without_contact_data() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .resolve(
            default_business_id(),
            &ClientIdentity {
                name: "Robin".into(),
                email: Some("  ".into()),
                phone: None,
            },
            None,
        )
        .await;
    test_validation_error(
        &result,
        &ValidationFailureItem::InvalidValue("client".into()),
        1,
    );
}

#[tokio::test]
async fn test_resolve_new_client_needs_name() {
    let mut deps = build_dependencies();
    deps.client_dao.checkpoint();
    deps.client_dao
        .expect_find_by_contact()
        .returning(|_, _, _, _| Ok(None));
    let service = deps.build_service();
    let result = service
        .resolve(
            default_business_id(),
            &ClientIdentity {
                name: " ".into(),
                email: Some("new@example.com".into()),
                phone: None,
            },
            None,
        )
        .await;
    test_validation_error(
        &result,
        &ValidationFailureItem::InvalidValue("name".into()),
        1,
    );
}

#[tokio::test]
async fn test_get_of_other_business() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .get(uuid!("6F700000-0000-4000-8000-0000000000FF"), default_id(), None)
        .await;
    test_not_found(&result, &default_id());
}
