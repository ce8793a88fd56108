use crate::gen_service_impl;
use async_trait::async_trait;
use dao::{offering::OfferingDao, TransactionDao};
use service::{
    offering::{Offering, OfferingService},
    ServiceError,
};
use uuid::Uuid;

gen_service_impl! {
    struct OfferingServiceImpl: OfferingService = OfferingServiceDeps {
        OfferingDao: OfferingDao<Transaction = Self::Transaction> = offering_dao,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

#[async_trait]
impl<Deps: OfferingServiceDeps> OfferingService for OfferingServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    async fn get_for_branch(
        &self,
        business_id: Uuid,
        offering_id: Uuid,
        branch_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Offering, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let offering = self
            .offering_dao
            .find_by_id(offering_id, tx.clone())
            .await?
            .filter(|offering| offering.business_id == business_id && offering.deleted.is_none())
            .ok_or(ServiceError::EntityNotFound(offering_id))?;
        let assignment = self
            .offering_dao
            .find_branch_assignment(offering_id, branch_id, tx.clone())
            .await?;
        if !offering.global && assignment.is_none() {
            return Err(ServiceError::EntityNotFound(offering_id));
        }

        self.transaction_dao.commit(tx).await?;
        Ok(Offering {
            id: offering.id,
            business_id: offering.business_id,
            branch_id,
            name: offering.name.clone(),
            duration_minutes: offering.duration_minutes,
            price_cents: assignment
                .and_then(|assignment| assignment.price_cents)
                .unwrap_or(offering.price_cents),
        })
    }
}
