// ============================================================================
// Robo Core - Member Service
// File: crates/robo-core/src/services/member_service.rs
// ============================================================================
//! Recruitment roster management

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use robo_shared::utils::mask_email;
use robo_shared::Pagination;

use crate::domain::{ActingUser, Member, MemberRole};
use crate::error::DomainError;
use crate::repositories::MemberRepository;

/// Registration payload for a new roster member
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterMember {
    pub full_name: String,
    pub nim: String,
    pub email: String,
    #[serde(default)]
    pub role: MemberRole,
    pub or_period: String,
}

pub struct MemberService {
    members: Arc<dyn MemberRepository>,
}

impl MemberService {
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }

    /// Register a member into an OR period roster
    pub async fn register(&self, input: RegisterMember, actor: &ActingUser) -> Result<Member, DomainError> {
        actor.require_staff("Registering members")?;
        if input.role != MemberRole::Caang {
            actor.require_admin("Registering staff accounts")?;
        }

        let member = Member::new(
            input.full_name,
            input.nim,
            input.email,
            input.role,
            input.or_period,
            Some(actor.user_id),
        )?;

        if self.members.find_by_nim(&member.or_period, &member.nim).await?.is_some() {
            warn!("Registration rejected: NIM {} already in {}", member.nim, member.or_period);
            return Err(DomainError::NimAlreadyRegistered {
                or_period: member.or_period,
                nim: member.nim,
            });
        }

        let created = self.members.create(&member).await?;
        info!(
            "Registered member {} <{}> ({}) in {}",
            created.id,
            mask_email(&created.email),
            created.role.as_str(),
            created.or_period
        );
        Ok(created)
    }

    pub async fn get(&self, id: &Uuid) -> Result<Member, DomainError> {
        self.members
            .find_by_id(id)
            .await?
            .ok_or(DomainError::MemberNotFound(*id))
    }

    pub async fn list_by_period(&self, or_period: &str, page: &Pagination) -> Result<Vec<Member>, DomainError> {
        self.members.list_by_period(or_period, page).await
    }

    pub async fn deactivate(&self, id: &Uuid, actor: &ActingUser) -> Result<Member, DomainError> {
        actor.require_admin("Deactivating members")?;

        let mut member = self.get(id).await?;
        member.deactivate(actor.user_id);
        let updated = self.members.update(&member).await?;

        info!("Deactivated member {}", id);
        Ok(updated)
    }
}
