use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::ServiceError;

/// Risk assessment of a client as computed by the scoring collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoringSummary {
    pub score: i32,
    pub no_show_count: u32,
    pub reason: Arc<str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentDecision {
    pub requires_online_payment: bool,
    pub scoring: ScoringSummary,
}

/// Decides whether a client has to prepay online.
#[automock]
#[async_trait]
pub trait PaymentValidationService {
    async fn evaluate(
        &self,
        business_id: Uuid,
        email: Option<Arc<str>>,
        phone: Option<Arc<str>>,
    ) -> Result<PaymentDecision, ServiceError>;
}
