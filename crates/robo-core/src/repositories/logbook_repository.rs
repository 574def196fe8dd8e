//! Logbook repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{LogbookEntry, LogbookKind};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogbookRepository: Send + Sync {
    async fn create(&self, entry: &LogbookEntry) -> Result<LogbookEntry, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<LogbookEntry>, DomainError>;
    /// Newest activity date first.
    async fn list_by_member(
        &self,
        member_id: &Uuid,
        kind: Option<LogbookKind>,
    ) -> Result<Vec<LogbookEntry>, DomainError>;
    async fn update(&self, entry: &LogbookEntry) -> Result<LogbookEntry, DomainError>;
}
