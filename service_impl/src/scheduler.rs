use crate::gen_service_impl;
use async_trait::async_trait;
use chrono::Local;
use service::{
    booking::BookingService, config::ConfigService, scheduler::SchedulerService, ServiceError,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron::{Job, Scheduler};
use tracing::{error, info};

gen_service_impl! {
    struct SchedulerServiceImpl: SchedulerService = SchedulerServiceDeps {
        BookingService: BookingService = booking_service,
        ConfigService: ConfigService = config_service,
    }
    ; custom_fields {
        scheduler: Arc<Mutex<Scheduler<Local>>> = scheduler
    }
}

impl<Deps: SchedulerServiceDeps> SchedulerServiceImpl<Deps> {
    pub fn new(
        booking_service: Arc<Deps::BookingService>,
        config_service: Arc<Deps::ConfigService>,
    ) -> Self {
        Self {
            booking_service,
            config_service,
            scheduler: Arc::new(Mutex::new(Scheduler::local())),
        }
    }
}

#[async_trait]
impl<Deps: SchedulerServiceDeps> SchedulerService for SchedulerServiceImpl<Deps>
where
    Deps::BookingService: 'static,
    Deps::ConfigService: 'static,
{
    async fn start(&self) -> Result<(), ServiceError> {
        self.schedule_pending_payment_expiry("0 * * * * *").await?;
        Ok(())
    }

    async fn schedule_pending_payment_expiry(
        &self,
        cron: &'static str,
    ) -> Result<(), ServiceError> {
        let mut sched = self.scheduler.lock().await;

        let booking_service = self.booking_service.clone();
        let config_service = self.config_service.clone();

        sched.add(Job::new(cron, move || {
            let booking_service = booking_service.clone();
            let config_service = config_service.clone();
            async move {
                let ttl = match config_service.get_config().await {
                    Ok(config) => config.pending_payment_ttl,
                    Err(e) => {
                        error!("Failed to read config for payment expiry: {:?}", e);
                        return;
                    }
                };
                match booking_service.expire_pending_payments(ttl).await {
                    Ok(expired) if !expired.is_empty() => {
                        info!("Cancelled {} unpaid appointments (cron job)", expired.len())
                    }
                    Ok(_) => {}
                    Err(e) => error!("Failed to expire pending payments: {:?}", e),
                }
            }
        }));

        info!("Scheduled pending payment expiry with cron expression: {}", cron);
        Ok(())
    }
}
