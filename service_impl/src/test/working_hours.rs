use dao::professional::{MockProfessionalDao, ProfessionalEntity};
use dao::working_hours::{MockWorkingHoursDao, WorkingHoursEntity};
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::eq;
use service::clock::MockClockService;
use service::uuid_service::MockUuidService;
use service::working_hours::{WorkingHours, WorkingHoursService};
use service::{DayOfWeek, ValidationFailureItem};
use time::macros::{datetime, time};
use uuid::{uuid, Uuid};

use crate::test::error_test::{
    test_conflicts, test_not_found, test_time_order_wrong, test_validation_error,
    test_zero_id_error, test_zero_version_error,
};
use crate::working_hours::{WorkingHoursServiceDeps, WorkingHoursServiceImpl};

pub fn default_business_id() -> Uuid {
    uuid!("4D5E0000-0000-4000-8000-000000000001")
}
pub fn default_professional_id() -> Uuid {
    uuid!("4D5E0000-0000-4000-8000-000000000002")
}
pub fn default_id() -> Uuid {
    uuid!("4D5E0000-0000-4000-8000-000000000003")
}
pub fn previous_id() -> Uuid {
    uuid!("4D5E0000-0000-4000-8000-000000000004")
}
pub fn default_version() -> Uuid {
    uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E50")
}
pub fn alternate_version() -> Uuid {
    uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E51")
}

fn default_working_hours() -> WorkingHours {
    WorkingHours {
        id: default_id(),
        professional_id: default_professional_id(),
        day_of_week: DayOfWeek::Monday,
        from: time!(09:00),
        to: time!(13:00),
        active: true,
        created: None,
        deleted: None,
        version: default_version(),
    }
}

fn default_working_hours_entity() -> WorkingHoursEntity {
    WorkingHoursEntity {
        id: default_id(),
        professional_id: default_professional_id(),
        day_of_week: DayOfWeek::Monday,
        from: time!(09:00),
        to: time!(13:00),
        active: true,
        created: datetime!(2024-01-01 08:00),
        deleted: None,
        version: default_version(),
    }
}

fn new_working_hours() -> WorkingHours {
    WorkingHours {
        id: Uuid::nil(),
        version: Uuid::nil(),
        ..default_working_hours()
    }
}

struct WorkingHoursDependencies {
    working_hours_dao: MockWorkingHoursDao,
    professional_dao: MockProfessionalDao,
    clock_service: MockClockService,
    uuid_service: MockUuidService,
    transaction_dao: MockTransactionDao,
}

impl WorkingHoursServiceDeps for WorkingHoursDependencies {
    type Transaction = MockTransaction;
    type WorkingHoursDao = MockWorkingHoursDao;
    type ProfessionalDao = MockProfessionalDao;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}

impl WorkingHoursDependencies {
    fn build_service(self) -> WorkingHoursServiceImpl<WorkingHoursDependencies> {
        WorkingHoursServiceImpl {
            working_hours_dao: self.working_hours_dao.into(),
            professional_dao: self.professional_dao.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: self.transaction_dao.into(),
        }
    }
}

fn build_dependencies() -> WorkingHoursDependencies {
    let mut working_hours_dao = MockWorkingHoursDao::new();
    let mut professional_dao = MockProfessionalDao::new();
    let mut clock_service = MockClockService::new();
    let mut uuid_service = MockUuidService::new();
    let mut transaction_dao = MockTransactionDao::new();

    working_hours_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_working_hours_entity())));
    working_hours_dao
        .expect_find_active_by_professional_and_day()
        .returning(|_, _, _| Ok(None));
    professional_dao.expect_find_by_id().returning(|id, _| {
        Ok(Some(ProfessionalEntity {
            id,
            business_id: default_business_id(),
            branch_id: Uuid::nil(),
            name: "Alex".into(),
            active: true,
            deleted: None,
            version: default_version(),
        }))
    });
    clock_service
        .expect_date_time_now()
        .returning(|| datetime!(2024-01-14 12:00));
    uuid_service.expect_new_uuid().returning(|usage| match usage {
        "working-hours-id" => default_id(),
        _ => alternate_version(),
    });
    transaction_dao
        .expect_use_transaction()
        .returning(|_| Ok(MockTransaction));
    transaction_dao.expect_commit().returning(|_| Ok(()));

    WorkingHoursDependencies {
        working_hours_dao,
        professional_dao,
        clock_service,
        uuid_service,
        transaction_dao,
    }
}

#[tokio::test]
async fn test_active_window() {
    let mut deps = build_dependencies();
    deps.working_hours_dao.checkpoint();
    deps.working_hours_dao
        .expect_find_active_by_professional_and_day()
        .with(
            eq(default_professional_id()),
            eq(DayOfWeek::Monday),
            eq(MockTransaction),
        )
        .returning(|_, _, _| Ok(Some(default_working_hours_entity())));
    let service = deps.build_service();
    let window = service
        .active_window_for(default_professional_id(), DayOfWeek::Monday, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(window.from, time!(09:00));
    assert_eq!(window.to, time!(13:00));
}

#[tokio::test]
async fn test_create() {
    let mut deps = build_dependencies();
    deps.working_hours_dao
        .expect_create()
        .with(
            eq(WorkingHoursEntity {
                created: datetime!(2024-01-14 12:00),
                version: alternate_version(),
                ..default_working_hours_entity()
            }),
            eq("working-hours-service"),
            eq(MockTransaction),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let result = service
        .create(default_business_id(), &new_working_hours(), None)
        .await
        .unwrap();
    assert_eq!(result.id, default_id());
    assert_eq!(result.created, Some(datetime!(2024-01-14 12:00)));
}

#[tokio::test]
async fn test_create_deactivates_previous_window() {
    let mut deps = build_dependencies();
    deps.working_hours_dao.checkpoint();
    deps.working_hours_dao
        .expect_find_active_by_professional_and_day()
        .returning(|_, _, _| {
            Ok(Some(WorkingHoursEntity {
                id: previous_id(),
                from: time!(08:00),
                to: time!(12:00),
                ..default_working_hours_entity()
            }))
        });
    deps.working_hours_dao
        .expect_update()
        .withf(|entity, _, _| entity.id == previous_id() && !entity.active)
        .times(1)
        .returning(|_, _, _| Ok(()));
    deps.working_hours_dao
        .expect_create()
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    service
        .create(default_business_id(), &new_working_hours(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_with_id_set() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .create(
            default_business_id(),
            &WorkingHours {
                version: Uuid::nil(),
                ..default_working_hours()
            },
            None,
        )
        .await;
    test_zero_id_error(&result);
}

#[tokio::test]
async fn test_create_with_version_set() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .create(
            default_business_id(),
            &WorkingHours {
                id: Uuid::nil(),
                ..default_working_hours()
            },
            None,
        )
        .await;
    test_zero_version_error(&result);
}

#[tokio::test]
async fn test_create_time_order_wrong() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .create(
            default_business_id(),
            &WorkingHours {
                from: time!(13:00),
                to: time!(09:00),
                ..new_working_hours()
            },
            None,
        )
        .await;
    test_time_order_wrong(&result);
}

#[tokio::test]
async fn test_create_for_professional_of_other_business() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let other_business = uuid!("4D5E0000-0000-4000-8000-0000000000FF");
    let result = service
        .create(other_business, &new_working_hours(), None)
        .await;
    test_not_found(&result, &default_professional_id());
}

#[tokio::test]
async fn test_update_version_conflict() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .update(
            default_business_id(),
            &WorkingHours {
                version: alternate_version(),
                ..default_working_hours()
            },
            None,
        )
        .await;
    test_conflicts(
        &result,
        &default_id(),
        &default_version(),
        &alternate_version(),
    );
}

#[tokio::test]
async fn test_update_professional_not_modifiable() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .update(
            default_business_id(),
            &WorkingHours {
                professional_id: uuid!("4D5E0000-0000-4000-8000-0000000000EE"),
                ..default_working_hours()
            },
            None,
        )
        .await;
    test_validation_error(
        &result,
        &ValidationFailureItem::ModificationNotAllowed("professional_id".into()),
        1,
    );
}

#[tokio::test]
async fn test_delete_is_soft() {
    let mut deps = build_dependencies();
    deps.working_hours_dao
        .expect_update()
        .withf(|entity, _, _| {
            entity.id == default_id()
                && !entity.active
                && entity.deleted == Some(datetime!(2024-01-14 12:00))
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    service
        .delete(default_business_id(), default_id(), None)
        .await
        .unwrap();
}
