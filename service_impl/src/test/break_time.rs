use std::sync::Arc;

use dao::branch::{BranchEntity, MockBranchDao};
use dao::break_time::{BreakTimeEntity, MockBreakTimeDao};
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::eq;
use service::break_time::{BreakTime, BreakTimeService};
use service::clock::MockClockService;
use service::uuid_service::MockUuidService;
use service::DayOfWeek;
use time::macros::{datetime, time};
use uuid::{uuid, Uuid};

use crate::break_time::{BreakTimeServiceDeps, BreakTimeServiceImpl};
use crate::test::error_test::{
    test_conflicts, test_not_found, test_overlapping_time_range_error, test_time_order_wrong,
};

pub fn default_business_id() -> Uuid {
    uuid!("5E6F0000-0000-4000-8000-000000000001")
}
pub fn default_branch_id() -> Uuid {
    uuid!("5E6F0000-0000-4000-8000-000000000002")
}
pub fn default_id() -> Uuid {
    uuid!("5E6F0000-0000-4000-8000-000000000003")
}
pub fn default_version() -> Uuid {
    uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E50")
}
pub fn alternate_version() -> Uuid {
    uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E51")
}

fn default_break_time() -> BreakTime {
    BreakTime {
        id: default_id(),
        branch_id: default_branch_id(),
        day_of_week: DayOfWeek::Monday,
        from: time!(12:00),
        to: time!(12:30),
        label: "Lunch".into(),
        active: true,
        created: None,
        deleted: None,
        version: default_version(),
    }
}

fn default_break_time_entity() -> BreakTimeEntity {
    BreakTimeEntity {
        id: default_id(),
        branch_id: default_branch_id(),
        day_of_week: DayOfWeek::Monday,
        from: time!(12:00),
        to: time!(12:30),
        label: "Lunch".into(),
        active: true,
        created: datetime!(2024-01-01 08:00),
        deleted: None,
        version: default_version(),
    }
}

fn new_break_time(from: time::Time, to: time::Time) -> BreakTime {
    BreakTime {
        id: Uuid::nil(),
        version: Uuid::nil(),
        from,
        to,
        ..default_break_time()
    }
}

struct BreakTimeDependencies {
    break_time_dao: MockBreakTimeDao,
    branch_dao: MockBranchDao,
    clock_service: MockClockService,
    uuid_service: MockUuidService,
    transaction_dao: MockTransactionDao,
}

impl BreakTimeServiceDeps for BreakTimeDependencies {
    type Transaction = MockTransaction;
    type BreakTimeDao = MockBreakTimeDao;
    type BranchDao = MockBranchDao;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}

impl BreakTimeDependencies {
    fn build_service(self) -> BreakTimeServiceImpl<BreakTimeDependencies> {
        BreakTimeServiceImpl {
            break_time_dao: self.break_time_dao.into(),
            branch_dao: self.branch_dao.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: self.transaction_dao.into(),
        }
    }
}

fn build_dependencies() -> BreakTimeDependencies {
    let mut break_time_dao = MockBreakTimeDao::new();
    let mut branch_dao = MockBranchDao::new();
    let mut clock_service = MockClockService::new();
    let mut uuid_service = MockUuidService::new();
    let mut transaction_dao = MockTransactionDao::new();

    break_time_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_break_time_entity())));
    break_time_dao
        .expect_find_active_by_branch_and_day()
        .returning(|_, _, _| Ok(Arc::new([default_break_time_entity()])));
    branch_dao.expect_find_by_id().returning(|id, _| {
        Ok(Some(BranchEntity {
            id,
            business_id: default_business_id(),
            name: "Main".into(),
            timezone: "UTC".into(),
            is_main: true,
            active: true,
            created: datetime!(2024-01-01 08:00),
            deleted: None,
            version: default_version(),
        }))
    });
    clock_service
        .expect_date_time_now()
        .returning(|| datetime!(2024-01-14 12:00));
    uuid_service.expect_new_uuid().returning(|usage| match usage {
        "break-time-id" => uuid!("5E6F0000-0000-4000-8000-0000000000AA"),
        _ => alternate_version(),
    });
    transaction_dao
        .expect_use_transaction()
        .returning(|_| Ok(MockTransaction));
    transaction_dao.expect_commit().returning(|_| Ok(()));

    BreakTimeDependencies {
        break_time_dao,
        branch_dao,
        clock_service,
        uuid_service,
        transaction_dao,
    }
}

#[tokio::test]
async fn test_create_adjacent_break() {
    let mut deps = build_dependencies();
    deps.break_time_dao
        .expect_create()
        .withf(|entity, _, _| {
            entity.id == uuid!("5E6F0000-0000-4000-8000-0000000000AA")
                && entity.from == time!(15:00)
                && entity.to == time!(15:15)
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let break_time = service
        .create(
            default_business_id(),
            &new_break_time(time!(15:00), time!(15:15)),
            None,
        )
        .await
        .unwrap();
    assert_eq!(break_time.version, alternate_version());

    let mut deps = build_dependencies();
    deps.break_time_dao
        .expect_create()
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    service
        .create(
            default_business_id(),
            &new_break_time(time!(12:30), time!(13:00)),
            None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_overlapping_break() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .create(
            default_business_id(),
            &new_break_time(time!(12:15), time!(12:45)),
            None,
        )
        .await;
    test_overlapping_time_range_error(&result);
}

#[tokio::test]
async fn test_create_time_order_wrong() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .create(
            default_business_id(),
            &new_break_time(time!(15:00), time!(15:00)),
            None,
        )
        .await;
    test_time_order_wrong(&result);
}

#[tokio::test]
async fn test_create_for_foreign_branch() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let other_business = uuid!("5E6F0000-0000-4000-8000-0000000000FF");
    let result = service
        .create(
            other_business,
            &new_break_time(time!(15:00), time!(15:15)),
            None,
        )
        .await;
    test_not_found(&result, &default_branch_id());
}

#[tokio::test]
async fn test_update_does_not_overlap_with_itself() {
    let mut deps = build_dependencies();
    deps.break_time_dao
        .expect_update()
        .withf(|entity, _, _| entity.to == time!(12:45) && entity.version == alternate_version())
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    service
        .update(
            default_business_id(),
            &BreakTime {
                to: time!(12:45),
                ..default_break_time()
            },
            None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_version_conflict() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .update(
            default_business_id(),
            &BreakTime {
                version: alternate_version(),
                ..default_break_time()
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
async fn test_delete_unknown() {
    let mut deps = build_dependencies();
    deps.break_time_dao.checkpoint();
    deps.break_time_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let service = deps.build_service();
    let result = service
        .delete(default_business_id(), default_id(), None)
        .await;
    test_not_found(&result, &default_id());
}

#[tokio::test]
async fn test_active_breaks_ordered_by_start() {
    let mut deps = build_dependencies();
    deps.break_time_dao.checkpoint();
    deps.break_time_dao
        .expect_find_active_by_branch_and_day()
        .with(eq(default_branch_id()), eq(DayOfWeek::Monday), eq(MockTransaction))
        .returning(|_, _, _| {
            Ok(Arc::new([
                BreakTimeEntity {
                    id: uuid!("5E6F0000-0000-4000-8000-0000000000B1"),
                    from: time!(16:00),
                    to: time!(16:15),
                    label: "Coffee".into(),
                    ..default_break_time_entity()
                },
                BreakTimeEntity {
                    id: uuid!("5E6F0000-0000-4000-8000-0000000000B2"),
                    from: time!(09:00),
                    to: time!(09:30),
                    label: "Old opening".into(),
                    active: false,
                    ..default_break_time_entity()
                },
                default_break_time_entity(),
            ]))
        });
    let service = deps.build_service();

    let breaks = service
        .active_breaks_for(default_branch_id(), DayOfWeek::Monday, None)
        .await
        .unwrap();
    let spans: Vec<_> = breaks
        .iter()
        .map(|break_time| (break_time.from, break_time.to))
        .collect();
    assert_eq!(
        spans,
        vec![(time!(12:00), time!(12:30)), (time!(16:00), time!(16:15))]
    );
    assert!(breaks
        .windows(2)
        .all(|pair| pair[0].to <= pair[1].from));
}
