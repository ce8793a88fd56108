mod booking_flow;

use std::path::PathBuf;
use std::sync::Arc;

use rest::RestStateDef;
use service::{
    break_time::{BreakTime, BreakTimeService},
    working_hours::{WorkingHours, WorkingHoursService},
    DayOfWeek,
};
use service_impl::{notification::LogNotificationServiceImpl, outbox::outbox_channel};
use sqlx::SqlitePool;
use time::macros::time;
use uuid::Uuid;

use crate::RestStateImpl;

/// Monday, far enough in the future to never be in the past.
pub const BOOKING_DAY: time::Date = time::macros::date!(2099 - 01 - 05);

/// A fresh SQLite file with one business, one branch, one professional
/// working 09:00 to 13:00 on Mondays, a lunch break from 12:00 to 12:30 and
/// a 30 minute offering.
pub struct TestSetup {
    pub rest_state: RestStateImpl,
    pub pool: Arc<SqlitePool>,
    pub business_id: Uuid,
    pub branch_id: Uuid,
    pub professional_id: Uuid,
    pub offering_id: Uuid,
    database_file: PathBuf,
}

impl TestSetup {
    pub async fn new() -> Self {
        let database_file =
            std::env::temp_dir().join(format!("agendo-test-{}.sqlite3", Uuid::new_v4()));
        let pool = Arc::new(
            SqlitePool::connect(&format!("sqlite:{}?mode=rwc", database_file.display()))
                .await
                .expect("Could not connect to database"),
        );
        sqlx::migrate!("../migrations/sqlite")
            .run(pool.as_ref())
            .await
            .expect("Failed to run migrations");

        let (outbox_service, outbox_receiver) = outbox_channel();
        tokio::spawn(outbox_receiver.run(Arc::new(LogNotificationServiceImpl)));
        let rest_state = RestStateImpl::new(pool.clone(), outbox_service);

        let setup = Self {
            rest_state,
            pool,
            business_id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            professional_id: Uuid::new_v4(),
            offering_id: Uuid::new_v4(),
            database_file,
        };
        setup.seed().await;
        setup
    }

    async fn seed(&self) {
        let version = Uuid::new_v4().as_bytes().to_vec();
        sqlx::query(
            "INSERT INTO business (id, name, slot_granularity_minutes, update_version, update_process) \
             VALUES (?, 'Salon', 30, ?, 'test')",
        )
        .bind(self.business_id.as_bytes().to_vec())
        .bind(version.clone())
        .execute(self.pool.as_ref())
        .await
        .expect("Could not seed business");
        sqlx::query(
            "INSERT INTO branch (id, business_id, name, timezone, is_main, active, created, update_version, update_process) \
             VALUES (?, ?, 'Main', 'UTC', 1, 1, '2024-01-01T00:00:00', ?, 'test')",
        )
        .bind(self.branch_id.as_bytes().to_vec())
        .bind(self.business_id.as_bytes().to_vec())
        .bind(version.clone())
        .execute(self.pool.as_ref())
        .await
        .expect("Could not seed branch");
        sqlx::query(
            "INSERT INTO professional (id, business_id, branch_id, name, active, update_version, update_process) \
             VALUES (?, ?, ?, 'Alex', 1, ?, 'test')",
        )
        .bind(self.professional_id.as_bytes().to_vec())
        .bind(self.business_id.as_bytes().to_vec())
        .bind(self.branch_id.as_bytes().to_vec())
        .bind(version.clone())
        .execute(self.pool.as_ref())
        .await
        .expect("Could not seed professional");
        sqlx::query(
            "INSERT INTO offering (id, business_id, name, duration_minutes, price_cents, global, update_version, update_process) \
             VALUES (?, ?, 'Haircut', 30, 2500, 1, ?, 'test')",
        )
        .bind(self.offering_id.as_bytes().to_vec())
        .bind(self.business_id.as_bytes().to_vec())
        .bind(version)
        .execute(self.pool.as_ref())
        .await
        .expect("Could not seed offering");

        self.rest_state
            .working_hours_service()
            .create(
                self.business_id,
                &WorkingHours {
                    id: Uuid::nil(),
                    professional_id: self.professional_id,
                    day_of_week: DayOfWeek::Monday,
                    from: time!(09:00),
                    to: time!(13:00),
                    active: true,
                    created: None,
                    deleted: None,
                    version: Uuid::nil(),
                },
                None,
            )
            .await
            .expect("Could not create working hours");
        self.rest_state
            .break_time_service()
            .create(
                self.business_id,
                &BreakTime {
                    id: Uuid::nil(),
                    branch_id: self.branch_id,
                    day_of_week: DayOfWeek::Monday,
                    from: time!(12:00),
                    to: time!(12:30),
                    label: "Lunch".into(),
                    active: true,
                    created: None,
                    deleted: None,
                    version: Uuid::nil(),
                },
                None,
            )
            .await
            .expect("Could not create break time");
    }

    pub async fn count_active_appointments(&self) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointment \
             WHERE professional_id = ? AND status IN ('PENDING_PAYMENT', 'CONFIRMED')",
        )
        .bind(self.professional_id.as_bytes().to_vec())
        .fetch_one(self.pool.as_ref())
        .await
        .expect("Could not count appointments")
    }
}

impl Drop for TestSetup {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.database_file);
    }
}
