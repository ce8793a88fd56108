use std::sync::Arc;

use crate::gen_service_impl;
use async_trait::async_trait;
use dao::{branch::BranchDao, business::BusinessDao, TransactionDao};
use service::{
    branch::{Branch, BranchService, MAIN_BRANCH_NAME},
    clock::ClockService,
    config::ConfigService,
    uuid_service::UuidService,
    ServiceError,
};
use tracing::info;
use uuid::Uuid;

const BRANCH_SERVICE_PROCESS: &str = "branch-service";

gen_service_impl! {
    struct BranchServiceImpl: BranchService = BranchServiceDeps {
        BranchDao: BranchDao<Transaction = Self::Transaction> = branch_dao,
        BusinessDao: BusinessDao<Transaction = Self::Transaction> = business_dao,
        ConfigService: ConfigService = config_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

impl<Deps: BranchServiceDeps> BranchServiceImpl<Deps> {
    async fn ensure_business(
        &self,
        business_id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        self.business_dao
            .find_by_id(business_id, tx)
            .await?
            .filter(|business| business.deleted.is_none())
            .map(|_| ())
            .ok_or(ServiceError::EntityNotFound(business_id))
    }

    async fn provision_main_branch(
        &self,
        business_id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<Branch, ServiceError> {
        let config = self.config_service.get_config().await?;
        let branch = Branch {
            id: self.uuid_service.new_uuid("branch-id"),
            business_id,
            name: MAIN_BRANCH_NAME.into(),
            timezone: config.default_timezone.clone(),
            is_main: true,
            active: true,
            created: Some(self.clock_service.date_time_now()),
            deleted: None,
            version: self.uuid_service.new_uuid("branch-version"),
        };
        self.branch_dao
            .create(&(&branch).try_into()?, BRANCH_SERVICE_PROCESS, tx)
            .await?;
        info!(
            "Provisioned main branch {} for business {}",
            branch.id, business_id
        );
        Ok(branch)
    }

    async fn load_branches(
        &self,
        business_id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<Arc<[Branch]>, ServiceError> {
        self.ensure_business(business_id, tx.clone()).await?;
        let branches: Arc<[Branch]> = self
            .branch_dao
            .find_by_business_id(business_id, tx.clone())
            .await?
            .iter()
            .map(Branch::from)
            .collect();
        if branches.is_empty() {
            Ok([self.provision_main_branch(business_id, tx).await?].into())
        } else {
            Ok(branches)
        }
    }

    async fn clear_main_flags(
        &self,
        branches: &[Branch],
        except: Uuid,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        for branch in branches
            .iter()
            .filter(|branch| branch.is_main && branch.id != except)
        {
            let branch = Branch {
                is_main: false,
                version: self.uuid_service.new_uuid("branch-version"),
                ..branch.clone()
            };
            self.branch_dao
                .update(&(&branch).try_into()?, BRANCH_SERVICE_PROCESS, tx.clone())
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<Deps: BranchServiceDeps> BranchService for BranchServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    async fn get_all(
        &self,
        business_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Branch]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let branches = self.load_branches(business_id, tx.clone()).await?;
        self.transaction_dao.commit(tx).await?;
        Ok(branches)
    }

    async fn get(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Branch, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let branch = self
            .branch_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|branch| branch.business_id == business_id && branch.deleted.is_none())
            .as_ref()
            .map(Branch::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(branch)
    }

    async fn resolve(
        &self,
        business_id: Uuid,
        requested: Option<Uuid>,
        tx: Option<Self::Transaction>,
    ) -> Result<Branch, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let branches = self.load_branches(business_id, tx.clone()).await?;

        if let Some(requested) = requested {
            let branch = branches
                .iter()
                .find(|branch| branch.id == requested)
                .ok_or(ServiceError::EntityNotFound(requested))?;
            if branch.active {
                let branch = branch.clone();
                self.transaction_dao.commit(tx).await?;
                return Ok(branch);
            }
            info!("Branch {} is inactive, resolving a replacement", requested);
        }

        let resolved = branches
            .iter()
            .find(|branch| branch.active && branch.is_main)
            .or_else(|| branches.iter().find(|branch| branch.active))
            .cloned();
        let branch = match resolved {
            Some(branch) => branch,
            None => {
                self.clear_main_flags(&branches, Uuid::nil(), tx.clone())
                    .await?;
                self.provision_main_branch(business_id, tx.clone()).await?
            }
        };
        self.transaction_dao.commit(tx).await?;
        Ok(branch)
    }

    async fn create(
        &self,
        branch: &Branch,
        tx: Option<Self::Transaction>,
    ) -> Result<Branch, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        if branch.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if branch.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        if branch.deleted.is_some() {
            return Err(ServiceError::DeletedSetOnCreate);
        }
        if branch.name.trim().is_empty() {
            return Err(ServiceError::invalid_value("name"));
        }
        if time_tz::timezones::get_by_name(&branch.timezone).is_none() {
            return Err(ServiceError::invalid_value("timezone"));
        }

        let existing = self.load_branches(branch.business_id, tx.clone()).await?;
        let branch = Branch {
            id: self.uuid_service.new_uuid("branch-id"),
            version: self.uuid_service.new_uuid("branch-version"),
            created: Some(self.clock_service.date_time_now()),
            is_main: branch.is_main && branch.active,
            ..branch.clone()
        };
        if branch.is_main {
            self.clear_main_flags(&existing, branch.id, tx.clone())
                .await?;
        }
        self.branch_dao
            .create(&(&branch).try_into()?, BRANCH_SERVICE_PROCESS, tx.clone())
            .await?;

        self.transaction_dao.commit(tx).await?;
        Ok(branch)
    }

    async fn set_main(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Branch, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let branches = self.load_branches(business_id, tx.clone()).await?;
        let branch = branches
            .iter()
            .find(|branch| branch.id == id)
            .ok_or(ServiceError::EntityNotFound(id))?;
        if !branch.active {
            return Err(ServiceError::invalid_value("active"));
        }
        if branch.is_main {
            let branch = branch.clone();
            self.transaction_dao.commit(tx).await?;
            return Ok(branch);
        }

        self.clear_main_flags(&branches, id, tx.clone()).await?;
        let branch = Branch {
            is_main: true,
            version: self.uuid_service.new_uuid("branch-version"),
            ..branch.clone()
        };
        self.branch_dao
            .update(&(&branch).try_into()?, BRANCH_SERVICE_PROCESS, tx.clone())
            .await?;

        self.transaction_dao.commit(tx).await?;
        Ok(branch)
    }
}
