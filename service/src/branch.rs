use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::ServiceError;

pub const MAIN_BRANCH_NAME: &str = "Main";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: Arc<str>,
    /// IANA timezone name, e.g. `Europe/Berlin`.
    pub timezone: Arc<str>,
    pub is_main: bool,
    pub active: bool,
    pub created: Option<PrimitiveDateTime>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::branch::BranchEntity> for Branch {
    fn from(branch: &dao::branch::BranchEntity) -> Self {
        Self {
            id: branch.id,
            business_id: branch.business_id,
            name: branch.name.clone(),
            timezone: branch.timezone.clone(),
            is_main: branch.is_main,
            active: branch.active,
            created: Some(branch.created),
            deleted: branch.deleted,
            version: branch.version,
        }
    }
}

impl TryFrom<&Branch> for dao::branch::BranchEntity {
    type Error = ServiceError;
    fn try_from(branch: &Branch) -> Result<Self, Self::Error> {
        Ok(Self {
            id: branch.id,
            business_id: branch.business_id,
            name: branch.name.clone(),
            timezone: branch.timezone.clone(),
            is_main: branch.is_main,
            active: branch.active,
            created: branch.created.ok_or(ServiceError::InternalError)?,
            deleted: branch.deleted,
            version: branch.version,
        })
    }
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait BranchService {
    type Transaction: dao::Transaction;

    /// All branches of the business. A business without branches gets an
    /// active main branch provisioned on first access.
    async fn get_all(
        &self,
        business_id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Branch]>, ServiceError>;

    async fn get(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Branch, ServiceError>;

    /// The requested branch if it is active, otherwise the main branch,
    /// otherwise any active branch.
    async fn resolve(
        &self,
        business_id: Uuid,
        requested: Option<Uuid>,
        tx: Option<Self::Transaction>,
    ) -> Result<Branch, ServiceError>;

    async fn create(
        &self,
        branch: &Branch,
        tx: Option<Self::Transaction>,
    ) -> Result<Branch, ServiceError>;

    /// Flags the branch as main and clears the flag on every other branch.
    async fn set_main(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Option<Self::Transaction>,
    ) -> Result<Branch, ServiceError>;
}
