use std::{env, str::FromStr, sync::Arc};

use async_trait::async_trait;
use service::{
    config::{BookingConfig, ConfigService},
    ServiceError,
};
use tracing::warn;

/// Reads the booking configuration from the environment on every call.
pub struct ConfigServiceImpl;

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid value {:?} of {}", value, name);
            default
        }),
        Err(_) => default,
    }
}

#[async_trait]
impl ConfigService for ConfigServiceImpl {
    async fn get_config(&self) -> Result<BookingConfig, ServiceError> {
        let defaults = BookingConfig::default();
        let default_timezone =
            env::var("DEFAULT_TIMEZONE").unwrap_or(defaults.default_timezone.to_string());
        let payment_checkout_base_url = env::var("PAYMENT_CHECKOUT_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Ok(BookingConfig {
            default_timezone: Arc::from(default_timezone),
            default_slot_granularity_minutes: env_or(
                "DEFAULT_SLOT_GRANULARITY_MINUTES",
                defaults.default_slot_granularity_minutes,
            ),
            store_timeout: std::time::Duration::from_millis(env_or(
                "STORE_TIMEOUT_MS",
                defaults.store_timeout.as_millis() as u64,
            )),
            collaborator_timeout: std::time::Duration::from_millis(env_or(
                "COLLABORATOR_TIMEOUT_MS",
                defaults.collaborator_timeout.as_millis() as u64,
            )),
            max_contention_retries: env_or(
                "MAX_CONTENTION_RETRIES",
                defaults.max_contention_retries,
            ),
            pending_payment_ttl: time::Duration::minutes(env_or(
                "PENDING_PAYMENT_TTL_MINUTES",
                defaults.pending_payment_ttl.whole_minutes(),
            )),
            payment_checkout_base_url: payment_checkout_base_url.map(Arc::from),
        })
    }
}
