//! Group repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Group;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Group>, DomainError>;
    async fn find_by_name(&self, or_period: &str, name: &str) -> Result<Option<Group>, DomainError>;
    async fn list_by_period(&self, or_period: &str) -> Result<Vec<Group>, DomainError>;
    async fn create(&self, group: &Group) -> Result<Group, DomainError>;
    /// Soft-delete the group together with all of its sub-groups.
    async fn soft_delete(&self, group: &Group) -> Result<(), DomainError>;
}
