//! Common types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub type EntityId = Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Pagination {
    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page.clamp(1, MAX_PAGE_SIZE))
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * self.limit()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_PAGE_SIZE }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub created_by: Option<EntityId>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<EntityId>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<EntityId>,
}

impl AuditFields {
    pub fn created_by(actor: EntityId) -> Self {
        Self {
            created_by: Some(actor),
            ..Self::default()
        }
    }

    pub fn touch(&mut self, actor: EntityId) {
        self.modified_at = Some(Utc::now());
        self.modified_by = Some(actor);
    }

    pub fn remove(&mut self, actor: EntityId) {
        let now = Utc::now();
        self.removed_at = Some(now);
        self.removed_by = Some(actor);
        self.modified_at = Some(now);
        self.modified_by = Some(actor);
    }

    pub fn is_removed(&self) -> bool {
        self.removed_at.is_some()
    }
}

impl Default for AuditFields {
    fn default() -> Self {
        Self {
            created_at: Utc::now(),
            created_by: None,
            modified_at: None,
            modified_by: None,
            removed_at: None,
            removed_by: None,
        }
    }
}
