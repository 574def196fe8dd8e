//! Sub-group repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::SubGroup;
use crate::error::DomainError;

/// Every write refreshes the parent's `total_sub_groups`/`total_members`
/// counters in the same transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubGroupRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<SubGroup>, DomainError>;
    /// Active sub-groups of a parent, ordered by creation then name.
    async fn list_by_parent(&self, parent_id: &Uuid) -> Result<Vec<SubGroup>, DomainError>;
    /// Atomically soft-delete the parent's current sub-groups and insert
    /// `sub_groups` in their place.
    async fn replace_all(
        &self,
        parent_id: &Uuid,
        sub_groups: &[SubGroup],
        actor: &Uuid,
    ) -> Result<Vec<SubGroup>, DomainError>;
    async fn update(&self, sub_group: &SubGroup) -> Result<SubGroup, DomainError>;
}
