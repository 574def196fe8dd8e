//! Task and submission repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Task, TaskSubmission};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create_task(&self, task: &Task) -> Result<Task, DomainError>;
    async fn find_task(&self, id: &Uuid) -> Result<Option<Task>, DomainError>;
    async fn list_tasks(&self, or_period: &str) -> Result<Vec<Task>, DomainError>;
    async fn find_submission(&self, id: &Uuid) -> Result<Option<TaskSubmission>, DomainError>;
    async fn find_member_submission(
        &self,
        task_id: &Uuid,
        member_id: &Uuid,
    ) -> Result<Option<TaskSubmission>, DomainError>;
    /// Insert or update by submission id.
    async fn save_submission(&self, submission: &TaskSubmission) -> Result<TaskSubmission, DomainError>;
    async fn list_submissions(&self, task_id: &Uuid) -> Result<Vec<TaskSubmission>, DomainError>;
}
