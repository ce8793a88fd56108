#[cfg(test)]
mod integration_test;

use std::sync::Arc;

use dao_impl_sqlite::{
    appointment::AppointmentDaoImpl, branch::BranchDaoImpl, break_time::BreakTimeDaoImpl,
    business::BusinessDaoImpl, client::ClientDaoImpl, offering::OfferingDaoImpl,
    professional::ProfessionalDaoImpl, working_hours::WorkingHoursDaoImpl, TransactionDaoImpl,
    TransactionImpl,
};
use service::scheduler::SchedulerService;
use service_impl::{
    notification::LogNotificationServiceImpl,
    outbox::{outbox_channel, OutboxServiceImpl},
    payment::NoPrepaymentValidationServiceImpl,
    scheduler::SchedulerServiceImpl,
};
use sqlx::SqlitePool;
#[cfg(feature = "json_logging")]
use tracing_subscriber::fmt::format::FmtSpan;

const DEFAULT_DATABASE_URL: &str = "sqlite:./agendo.sqlite3?mode=rwc";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";

type Transaction = TransactionImpl;
type TransactionDao = TransactionDaoImpl;
type BusinessDao = BusinessDaoImpl;
type BranchDao = BranchDaoImpl;
type ProfessionalDao = ProfessionalDaoImpl;
type OfferingDao = OfferingDaoImpl;
type ClientDao = ClientDaoImpl;
type WorkingHoursDao = WorkingHoursDaoImpl;
type BreakTimeDao = BreakTimeDaoImpl;
type AppointmentDao = AppointmentDaoImpl;

type ConfigService = service_impl::config::ConfigServiceImpl;
type ClockService = service_impl::clock::ClockServiceImpl;
type UuidService = service_impl::uuid_service::UuidServiceImpl;
type PaymentValidationService = NoPrepaymentValidationServiceImpl;
type OutboxService = OutboxServiceImpl;

pub struct BranchServiceDependencies;
impl service_impl::branch::BranchServiceDeps for BranchServiceDependencies {
    type Transaction = Transaction;
    type BranchDao = BranchDao;
    type BusinessDao = BusinessDao;
    type ConfigService = ConfigService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type BranchService = service_impl::branch::BranchServiceImpl<BranchServiceDependencies>;

pub struct ProfessionalServiceDependencies;
impl service_impl::professional::ProfessionalServiceDeps for ProfessionalServiceDependencies {
    type Transaction = Transaction;
    type ProfessionalDao = ProfessionalDao;
    type TransactionDao = TransactionDao;
}
type ProfessionalService =
    service_impl::professional::ProfessionalServiceImpl<ProfessionalServiceDependencies>;

pub struct OfferingServiceDependencies;
impl service_impl::offering::OfferingServiceDeps for OfferingServiceDependencies {
    type Transaction = Transaction;
    type OfferingDao = OfferingDao;
    type TransactionDao = TransactionDao;
}
type OfferingService = service_impl::offering::OfferingServiceImpl<OfferingServiceDependencies>;

pub struct ClientServiceDependencies;
impl service_impl::client::ClientServiceDeps for ClientServiceDependencies {
    type Transaction = Transaction;
    type ClientDao = ClientDao;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type ClientService = service_impl::client::ClientServiceImpl<ClientServiceDependencies>;

pub struct WorkingHoursServiceDependencies;
impl service_impl::working_hours::WorkingHoursServiceDeps for WorkingHoursServiceDependencies {
    type Transaction = Transaction;
    type WorkingHoursDao = WorkingHoursDao;
    type ProfessionalDao = ProfessionalDao;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type WorkingHoursService =
    service_impl::working_hours::WorkingHoursServiceImpl<WorkingHoursServiceDependencies>;

pub struct BreakTimeServiceDependencies;
impl service_impl::break_time::BreakTimeServiceDeps for BreakTimeServiceDependencies {
    type Transaction = Transaction;
    type BreakTimeDao = BreakTimeDao;
    type BranchDao = BranchDao;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type BreakTimeService =
    service_impl::break_time::BreakTimeServiceImpl<BreakTimeServiceDependencies>;

pub struct PaymentGatewayServiceDependencies;
impl service_impl::payment::PaymentGatewayServiceDeps for PaymentGatewayServiceDependencies {
    type Transaction = Transaction;
    type ConfigService = ConfigService;
    type UuidService = UuidService;
}
type PaymentGatewayService =
    service_impl::payment::PaymentGatewayServiceImpl<PaymentGatewayServiceDependencies>;

pub struct AvailabilityServiceDependencies;
impl service_impl::availability::AvailabilityServiceDeps for AvailabilityServiceDependencies {
    type Transaction = Transaction;
    type BranchService = BranchService;
    type ProfessionalService = ProfessionalService;
    type OfferingService = OfferingService;
    type BusinessDao = BusinessDao;
    type WorkingHoursDao = WorkingHoursDao;
    type BreakTimeDao = BreakTimeDao;
    type AppointmentDao = AppointmentDao;
    type ConfigService = ConfigService;
    type ClockService = ClockService;
    type TransactionDao = TransactionDao;
}
type AvailabilityService =
    service_impl::availability::AvailabilityServiceImpl<AvailabilityServiceDependencies>;

pub struct BookingServiceDependencies;
impl service_impl::booking::BookingServiceDeps for BookingServiceDependencies {
    type Transaction = Transaction;
    type BranchService = BranchService;
    type ProfessionalService = ProfessionalService;
    type OfferingService = OfferingService;
    type ClientService = ClientService;
    type WorkingHoursDao = WorkingHoursDao;
    type BreakTimeDao = BreakTimeDao;
    type AppointmentDao = AppointmentDao;
    type PaymentValidationService = PaymentValidationService;
    type PaymentGatewayService = PaymentGatewayService;
    type OutboxService = OutboxService;
    type ConfigService = ConfigService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type BookingService = service_impl::booking::BookingServiceImpl<BookingServiceDependencies>;

pub struct SchedulerServiceDependencies;
impl service_impl::scheduler::SchedulerServiceDeps for SchedulerServiceDependencies {
    type Transaction = Transaction;
    type BookingService = BookingService;
    type ConfigService = ConfigService;
}

#[derive(Clone)]
pub struct RestStateImpl {
    availability_service: Arc<AvailabilityService>,
    booking_service: Arc<BookingService>,
    branch_service: Arc<BranchService>,
    working_hours_service: Arc<WorkingHoursService>,
    break_time_service: Arc<BreakTimeService>,
    config_service: Arc<ConfigService>,
}

impl rest::RestStateDef for RestStateImpl {
    type AvailabilityService = AvailabilityService;
    type BookingService = BookingService;
    type BranchService = BranchService;
    type WorkingHoursService = WorkingHoursService;
    type BreakTimeService = BreakTimeService;

    fn availability_service(&self) -> Arc<Self::AvailabilityService> {
        self.availability_service.clone()
    }
    fn booking_service(&self) -> Arc<Self::BookingService> {
        self.booking_service.clone()
    }
    fn branch_service(&self) -> Arc<Self::BranchService> {
        self.branch_service.clone()
    }
    fn working_hours_service(&self) -> Arc<Self::WorkingHoursService> {
        self.working_hours_service.clone()
    }
    fn break_time_service(&self) -> Arc<Self::BreakTimeService> {
        self.break_time_service.clone()
    }
}

impl RestStateImpl {
    pub fn new(pool: Arc<SqlitePool>, outbox_service: OutboxServiceImpl) -> Self {
        let transaction_dao = Arc::new(TransactionDao::new(pool.clone()));
        let business_dao = Arc::new(BusinessDao::new(pool.clone()));
        let branch_dao = Arc::new(BranchDao::new(pool.clone()));
        let professional_dao = Arc::new(ProfessionalDao::new(pool.clone()));
        let offering_dao = Arc::new(OfferingDao::new(pool.clone()));
        let client_dao = Arc::new(ClientDao::new(pool.clone()));
        let working_hours_dao = Arc::new(WorkingHoursDao::new(pool.clone()));
        let break_time_dao = Arc::new(BreakTimeDao::new(pool.clone()));
        let appointment_dao = Arc::new(AppointmentDao::new(pool));

        let config_service = Arc::new(service_impl::config::ConfigServiceImpl);
        let clock_service = Arc::new(service_impl::clock::ClockServiceImpl);
        let uuid_service = Arc::new(service_impl::uuid_service::UuidServiceImpl);

        let branch_service = Arc::new(service_impl::branch::BranchServiceImpl {
            branch_dao: branch_dao.clone(),
            business_dao: business_dao.clone(),
            config_service: config_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let professional_service =
            Arc::new(service_impl::professional::ProfessionalServiceImpl {
                professional_dao: professional_dao.clone(),
                transaction_dao: transaction_dao.clone(),
            });
        let offering_service = Arc::new(service_impl::offering::OfferingServiceImpl {
            offering_dao,
            transaction_dao: transaction_dao.clone(),
        });
        let client_service = Arc::new(service_impl::client::ClientServiceImpl {
            client_dao,
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let working_hours_service =
            Arc::new(service_impl::working_hours::WorkingHoursServiceImpl {
                working_hours_dao: working_hours_dao.clone(),
                professional_dao,
                clock_service: clock_service.clone(),
                uuid_service: uuid_service.clone(),
                transaction_dao: transaction_dao.clone(),
            });
        let break_time_service = Arc::new(service_impl::break_time::BreakTimeServiceImpl {
            break_time_dao: break_time_dao.clone(),
            branch_dao,
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let payment_gateway_service = Arc::new(service_impl::payment::PaymentGatewayServiceImpl {
            config_service: config_service.clone(),
            uuid_service: uuid_service.clone(),
        });
        let availability_service =
            Arc::new(service_impl::availability::AvailabilityServiceImpl {
                branch_service: branch_service.clone(),
                professional_service: professional_service.clone(),
                offering_service: offering_service.clone(),
                business_dao,
                working_hours_dao: working_hours_dao.clone(),
                break_time_dao: break_time_dao.clone(),
                appointment_dao: appointment_dao.clone(),
                config_service: config_service.clone(),
                clock_service: clock_service.clone(),
                transaction_dao: transaction_dao.clone(),
            });
        let booking_service = Arc::new(service_impl::booking::BookingServiceImpl {
            branch_service: branch_service.clone(),
            professional_service,
            offering_service,
            client_service,
            working_hours_dao,
            break_time_dao,
            appointment_dao,
            payment_validation_service: Arc::new(NoPrepaymentValidationServiceImpl),
            payment_gateway_service,
            outbox_service: Arc::new(outbox_service),
            config_service: config_service.clone(),
            clock_service,
            uuid_service,
            transaction_dao,
        });

        Self {
            availability_service,
            booking_service,
            branch_service,
            working_hours_service,
            break_time_service,
            config_service,
        }
    }

    pub fn scheduler_service(&self) -> SchedulerServiceImpl<SchedulerServiceDependencies> {
        SchedulerServiceImpl::new(self.booking_service.clone(), self.config_service.clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let version = env!("CARGO_PKG_VERSION");

    #[cfg(all(feature = "local_logging", not(feature = "json_logging")))]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .pretty()
        .with_file(true)
        .finish();

    #[cfg(feature = "json_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();

    #[cfg(not(any(feature = "local_logging", feature = "json_logging")))]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Agendo backend version: {}", version);
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let server_address =
        std::env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string());
    let pool = Arc::new(SqlitePool::connect(&database_url).await?);

    sqlx::migrate!("../migrations/sqlite")
        .run(pool.as_ref())
        .await?;

    let (outbox_service, outbox_receiver) = outbox_channel();
    tokio::spawn(outbox_receiver.run(Arc::new(LogNotificationServiceImpl)));

    let rest_state = RestStateImpl::new(pool, outbox_service);
    let scheduler_service = rest_state.scheduler_service();
    scheduler_service.start().await?;

    rest::start_server(rest_state, &server_address).await?;
    Ok(())
}
