use std::sync::Arc;

use crate::ServiceError;
use async_trait::async_trait;
use mockall::automock;

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_SLOT_GRANULARITY_MINUTES: u16 = 30;

/// Tunables of the booking engine. Read once per operation so changes in
/// the environment apply without a restart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingConfig {
    /// Timezone of auto-provisioned branches and fallback for unknown zones.
    pub default_timezone: Arc<str>,
    /// Discovery granularity for businesses which do not configure one.
    pub default_slot_granularity_minutes: u16,
    pub store_timeout: std::time::Duration,
    pub collaborator_timeout: std::time::Duration,
    pub max_contention_retries: u32,
    pub pending_payment_ttl: time::Duration,
    pub payment_checkout_base_url: Option<Arc<str>>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_timezone: DEFAULT_TIMEZONE.into(),
            default_slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
            store_timeout: std::time::Duration::from_millis(5000),
            collaborator_timeout: std::time::Duration::from_millis(2000),
            max_contention_retries: 3,
            pending_payment_ttl: time::Duration::minutes(30),
            payment_checkout_base_url: None,
        }
    }
}

#[automock]
#[async_trait]
pub trait ConfigService {
    async fn get_config(&self) -> Result<BookingConfig, ServiceError>;
}
