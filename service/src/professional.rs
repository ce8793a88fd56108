use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Professional {
    pub id: Uuid,
    pub business_id: Uuid,
    pub branch_id: Uuid,
    pub name: Arc<str>,
    pub active: bool,
}

impl From<&dao::professional::ProfessionalEntity> for Professional {
    fn from(professional: &dao::professional::ProfessionalEntity) -> Self {
        Self {
            id: professional.id,
            business_id: professional.business_id,
            branch_id: professional.branch_id,
            name: professional.name.clone(),
            active: professional.active,
        }
    }
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait ProfessionalService {
    type Transaction: dao::Transaction;

    /// Fails with `EntityNotFound` unless the professional is active and
    /// works at the given branch of the business.
    async fn get_active_in_branch(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        professional_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Professional, ServiceError>;

    /// Active professionals of the branch ordered by name, then id.
    async fn get_active_for_branch(
        &self,
        branch_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Professional]>, ServiceError>;
}
