// ============================================================================
// Robo Infrastructure - PostgreSQL Logbook Repository
// File: crates/robo-infrastructure/src/database/postgres/logbook_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use robo_core::domain::{LogbookEntry, LogbookKind, LogbookStatus};
use robo_core::error::DomainError;
use robo_core::repositories::LogbookRepository;
use robo_shared::AuditFields;

pub struct PgLogbookRepository {
    pool: PgPool,
}

impl PgLogbookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct LogbookRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub kind: String,
    pub title: String,
    pub activity_date: NaiveDate,
    pub description: String,
    pub status: String,
    pub reviewer_note: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl TryFrom<LogbookRow> for LogbookEntry {
    type Error = DomainError;

    fn try_from(row: LogbookRow) -> Result<Self, Self::Error> {
        let kind = LogbookKind::from_str(&row.kind)
            .ok_or_else(|| DomainError::InternalError(format!("Unknown logbook kind: {}", row.kind)))?;

        Ok(LogbookEntry {
            id: row.id,
            member_id: row.member_id,
            kind,
            title: row.title,
            activity_date: row.activity_date,
            description: row.description,
            status: LogbookStatus::from_str(&row.status).unwrap_or_default(),
            reviewer_note: row.reviewer_note,
            reviewed_at: row.reviewed_at,
            reviewed_by: row.reviewed_by,
            audit: AuditFields {
                created_at: row.created_at,
                created_by: row.created_by,
                modified_at: row.modified_at,
                modified_by: row.modified_by,
                removed_at: row.removed_at,
                removed_by: row.removed_by,
            },
        })
    }
}

#[async_trait]
impl LogbookRepository for PgLogbookRepository {
    async fn create(&self, entry: &LogbookEntry) -> Result<LogbookEntry, DomainError> {
        info!("Creating {} logbook entry for member {}", entry.kind.as_str(), entry.member_id);

        let row: LogbookRow = sqlx::query_as(
            r#"
            INSERT INTO logbook_entries (
                id, member_id, kind, title, activity_date, description,
                status, reviewer_note, reviewed_at, reviewed_by,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING
                id, member_id, kind, title, activity_date, description,
                status, reviewer_note, reviewed_at, reviewed_by,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            "#,
        )
        .bind(entry.id)
        .bind(entry.member_id)
        .bind(entry.kind.as_str())
        .bind(&entry.title)
        .bind(entry.activity_date)
        .bind(&entry.description)
        .bind(entry.status.as_str())
        .bind(&entry.reviewer_note)
        .bind(entry.reviewed_at)
        .bind(entry.reviewed_by)
        .bind(entry.audit.created_at)
        .bind(entry.audit.created_by)
        .bind(entry.audit.modified_at)
        .bind(entry.audit.modified_by)
        .bind(entry.audit.removed_at)
        .bind(entry.audit.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating logbook entry: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<LogbookEntry>, DomainError> {
        let row: Option<LogbookRow> = sqlx::query_as(
            r#"
            SELECT
                id, member_id, kind, title, activity_date, description,
                status, reviewer_note, reviewed_at, reviewed_by,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM logbook_entries
            WHERE id = $1 AND removed_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding logbook entry by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        row.map(LogbookEntry::try_from).transpose()
    }

    async fn list_by_member(
        &self,
        member_id: &Uuid,
        kind: Option<LogbookKind>,
    ) -> Result<Vec<LogbookEntry>, DomainError> {
        let rows: Vec<LogbookRow> = sqlx::query_as(
            r#"
            SELECT
                id, member_id, kind, title, activity_date, description,
                status, reviewer_note, reviewed_at, reviewed_by,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM logbook_entries
            WHERE member_id = $1
              AND ($2::VARCHAR IS NULL OR kind = $2)
              AND removed_at IS NULL
            ORDER BY activity_date DESC, created_at DESC
            "#,
        )
        .bind(member_id)
        .bind(kind.map(|k| k.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing logbook entries: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        rows.into_iter().map(LogbookEntry::try_from).collect()
    }

    async fn update(&self, entry: &LogbookEntry) -> Result<LogbookEntry, DomainError> {
        let row: LogbookRow = sqlx::query_as(
            r#"
            UPDATE logbook_entries
            SET
                title = $2,
                activity_date = $3,
                description = $4,
                status = $5,
                reviewer_note = $6,
                reviewed_at = $7,
                reviewed_by = $8,
                modified_at = $9,
                modified_by = $10
            WHERE id = $1
            RETURNING
                id, member_id, kind, title, activity_date, description,
                status, reviewer_note, reviewed_at, reviewed_by,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            "#,
        )
        .bind(entry.id)
        .bind(&entry.title)
        .bind(entry.activity_date)
        .bind(&entry.description)
        .bind(entry.status.as_str())
        .bind(&entry.reviewer_note)
        .bind(entry.reviewed_at)
        .bind(entry.reviewed_by)
        .bind(entry.audit.modified_at)
        .bind(entry.audit.modified_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating logbook entry: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?
        .ok_or(DomainError::LogbookNotFound(entry.id))?;

        row.try_into()
    }
}
