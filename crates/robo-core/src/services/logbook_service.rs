//! Internship and research logbooks

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::{ActingUser, LogbookEntry, LogbookKind};
use crate::error::DomainError;
use crate::repositories::{LogbookRepository, MemberRepository};

#[derive(Debug, Clone, Deserialize)]
pub struct NewLogbookEntry {
    pub kind: LogbookKind,
    pub title: String,
    pub activity_date: NaiveDate,
    pub description: String,
}

pub struct LogbookService {
    logbooks: Arc<dyn LogbookRepository>,
    members: Arc<dyn MemberRepository>,
}

impl LogbookService {
    pub fn new(logbooks: Arc<dyn LogbookRepository>, members: Arc<dyn MemberRepository>) -> Self {
        Self { logbooks, members }
    }

    pub async fn create_entry(
        &self,
        member_id: &Uuid,
        input: NewLogbookEntry,
        actor: &ActingUser,
    ) -> Result<LogbookEntry, DomainError> {
        actor.require_self_or_staff(member_id, "Writing logbook entries")?;

        let member = self
            .members
            .find_by_id(member_id)
            .await?
            .filter(|m| m.is_active && !m.audit.is_removed())
            .ok_or(DomainError::MemberNotFound(*member_id))?;

        let entry = LogbookEntry::new(
            member.id,
            input.kind,
            input.title,
            input.activity_date,
            input.description,
            actor.user_id,
        )?;
        let created = self.logbooks.create(&entry).await?;

        info!("Created {} logbook entry {} for member {}", created.kind.as_str(), created.id, member.id);
        Ok(created)
    }

    pub async fn list_entries(
        &self,
        member_id: &Uuid,
        kind: Option<LogbookKind>,
        actor: &ActingUser,
    ) -> Result<Vec<LogbookEntry>, DomainError> {
        actor.require_self_or_staff(member_id, "Reading logbooks")?;
        self.logbooks.list_by_member(member_id, kind).await
    }

    pub async fn review(
        &self,
        entry_id: &Uuid,
        approve: bool,
        note: Option<String>,
        actor: &ActingUser,
    ) -> Result<LogbookEntry, DomainError> {
        actor.require_staff("Reviewing logbooks")?;

        let mut entry = self
            .logbooks
            .find_by_id(entry_id)
            .await?
            .ok_or(DomainError::LogbookNotFound(*entry_id))?;
        entry.review(approve, note, actor.user_id)?;

        let saved = self.logbooks.update(&entry).await?;
        info!("Logbook entry {} marked {}", entry_id, saved.status.as_str());
        Ok(saved)
    }
}
