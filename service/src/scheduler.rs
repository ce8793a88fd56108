use crate::ServiceError;
use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait SchedulerService {
    /// Registers all periodic jobs and starts the scheduler in a background task.
    async fn start(&self) -> Result<(), ServiceError>;

    /// Periodically cancels appointments whose prepayment never arrived.
    /// `cron` is a six field cron expression, e.g. `"0 * * * * *"` for every minute.
    async fn schedule_pending_payment_expiry(&self, cron: &'static str)
        -> Result<(), ServiceError>;
}
