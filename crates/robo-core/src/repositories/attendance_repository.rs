//! Activity and attendance repository traits (ports)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Activity, AttendanceRecord};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Activity>, DomainError>;
    /// Active activities of the period, oldest first.
    async fn list_by_period(&self, or_period: &str) -> Result<Vec<Activity>, DomainError>;
    async fn create(&self, activity: &Activity) -> Result<Activity, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Insert, or overwrite the existing record for the same activity and member.
    async fn upsert(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, DomainError>;
    async fn list_by_period(&self, or_period: &str) -> Result<Vec<AttendanceRecord>, DomainError>;
    async fn list_by_member(&self, member_id: &Uuid) -> Result<Vec<AttendanceRecord>, DomainError>;
}
