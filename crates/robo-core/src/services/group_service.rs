//! Parent group management

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{ActingUser, Group};
use crate::error::DomainError;
use crate::repositories::GroupRepository;

#[derive(Debug, Clone, Deserialize)]
pub struct NewGroup {
    pub or_period: String,
    pub name: String,
    pub description: Option<String>,
}

pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn create(&self, input: NewGroup, actor: &ActingUser) -> Result<Group, DomainError> {
        actor.require_staff("Creating groups")?;

        let group = Group::new(input.or_period, input.name, input.description, actor.user_id)?;
        if self.groups.find_by_name(&group.or_period, &group.name).await?.is_some() {
            warn!("Group name {} already used in {}", group.name, group.or_period);
            return Err(DomainError::GroupNameAlreadyExists {
                or_period: group.or_period,
                name: group.name,
            });
        }

        let created = self.groups.create(&group).await?;
        info!("Created group {} ({}) in {}", created.id, created.name, created.or_period);
        Ok(created)
    }

    pub async fn get(&self, id: &Uuid) -> Result<Group, DomainError> {
        self.groups
            .find_by_id(id)
            .await?
            .filter(|g| !g.is_deleted())
            .ok_or(DomainError::GroupNotFound(*id))
    }

    pub async fn list_by_period(&self, or_period: &str) -> Result<Vec<Group>, DomainError> {
        self.groups.list_by_period(or_period).await
    }

    /// Soft-delete a group and its sub-groups
    pub async fn delete(&self, id: &Uuid, actor: &ActingUser) -> Result<(), DomainError> {
        actor.require_admin("Deleting groups")?;

        let mut group = self.get(id).await?;
        group.soft_delete(actor.user_id);
        self.groups.soft_delete(&group).await?;

        info!("Deleted group {} by {}", id, actor.user_id);
        Ok(())
    }
}
