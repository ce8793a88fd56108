use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::ServiceError;

/// A bookable service as offered at one branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Offering {
    pub id: Uuid,
    pub business_id: Uuid,
    pub branch_id: Uuid,
    pub name: Arc<str>,
    pub duration_minutes: u16,
    /// Branch price if the branch overrides it, the base price otherwise.
    pub price_cents: i64,
}

impl Offering {
    pub fn duration(&self) -> time::Duration {
        time::Duration::minutes(self.duration_minutes.into())
    }
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait OfferingService {
    type Transaction: dao::Transaction;

    /// Fails with `EntityNotFound` if the offering does not exist for the
    /// business or is not offered at the branch.
    async fn get_for_branch(
        &self,
        business_id: Uuid,
        offering_id: Uuid,
        branch_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Offering, ServiceError>;
}
