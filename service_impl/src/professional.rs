use std::sync::Arc;

use crate::gen_service_impl;
use async_trait::async_trait;
use dao::{professional::ProfessionalDao, TransactionDao};
use service::{
    professional::{Professional, ProfessionalService},
    ServiceError,
};
use uuid::Uuid;

gen_service_impl! {
    struct ProfessionalServiceImpl: ProfessionalService = ProfessionalServiceDeps {
        ProfessionalDao: ProfessionalDao<Transaction = Self::Transaction> = professional_dao,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

#[async_trait]
impl<Deps: ProfessionalServiceDeps> ProfessionalService for ProfessionalServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    async fn get_active_in_branch(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        professional_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Professional, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let professional = self
            .professional_dao
            .find_by_id(professional_id, tx.clone())
            .await?
            .filter(|professional| {
                professional.business_id == business_id
                    && professional.branch_id == branch_id
                    && professional.active
                    && professional.deleted.is_none()
            })
            .as_ref()
            .map(Professional::from)
            .ok_or(ServiceError::EntityNotFound(professional_id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(professional)
    }

    async fn get_active_for_branch(
        &self,
        branch_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Professional]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let professionals = self
            .professional_dao
            .find_active_by_branch_id(branch_id, tx.clone())
            .await?
            .iter()
            .map(Professional::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(professionals)
    }
}
