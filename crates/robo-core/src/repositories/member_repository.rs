//! Member repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use robo_shared::Pagination;

use crate::domain::Member;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Member>, DomainError>;
    async fn find_by_nim(&self, or_period: &str, nim: &str) -> Result<Option<Member>, DomainError>;
    async fn list_by_period(&self, or_period: &str, page: &Pagination) -> Result<Vec<Member>, DomainError>;
    /// Active caang of the period, ordered by full name then id.
    async fn list_eligible(&self, or_period: &str) -> Result<Vec<Member>, DomainError>;
    async fn create(&self, member: &Member) -> Result<Member, DomainError>;
    async fn update(&self, member: &Member) -> Result<Member, DomainError>;
}
