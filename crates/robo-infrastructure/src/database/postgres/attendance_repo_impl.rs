// ============================================================================
// Robo Infrastructure - PostgreSQL Activity & Attendance Repositories
// File: crates/robo-infrastructure/src/database/postgres/attendance_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info, warn};
use uuid::Uuid;

use robo_core::domain::{Activity, AttendanceRecord, AttendanceStatus};
use robo_core::error::DomainError;
use robo_core::repositories::{ActivityRepository, AttendanceRepository};
use robo_shared::AuditFields;

pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PgAttendanceRepository {
    pool: PgPool,
}

impl PgAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ActivityRow {
    pub id: Uuid,
    pub or_period: String,
    pub title: String,
    pub description: Option<String>,
    pub held_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        Activity {
            id: row.id,
            or_period: row.or_period,
            title: row.title,
            description: row.description,
            held_at: row.held_at,
            is_active: row.is_active,
            audit: AuditFields {
                created_at: row.created_at,
                created_by: row.created_by,
                modified_at: row.modified_at,
                modified_by: row.modified_by,
                removed_at: row.removed_at,
                removed_by: row.removed_by,
            },
        }
    }
}

#[derive(Debug, FromRow)]
struct AttendanceRow {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub member_id: Uuid,
    pub status: String,
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub recorded_by: Option<Uuid>,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        let status = AttendanceStatus::from_str(&row.status).unwrap_or_else(|| {
            warn!("Unknown attendance status '{}' on record {}, treating as absent", row.status, row.id);
            AttendanceStatus::Absent
        });

        AttendanceRecord {
            id: row.id,
            activity_id: row.activity_id,
            member_id: row.member_id,
            status,
            note: row.note,
            recorded_at: row.recorded_at,
            recorded_by: row.recorded_by,
        }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Activity>, DomainError> {
        let row: Option<ActivityRow> = sqlx::query_as(
            r#"
            SELECT
                id, or_period, title, description, held_at, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM activities
            WHERE id = $1 AND removed_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding activity by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_period(&self, or_period: &str) -> Result<Vec<Activity>, DomainError> {
        let rows: Vec<ActivityRow> = sqlx::query_as(
            r#"
            SELECT
                id, or_period, title, description, held_at, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM activities
            WHERE or_period = $1 AND is_active AND removed_at IS NULL
            ORDER BY held_at, id
            "#,
        )
        .bind(or_period)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing activities: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, activity: &Activity) -> Result<Activity, DomainError> {
        info!("Creating activity: {} ({})", activity.title, activity.or_period);

        let row: ActivityRow = sqlx::query_as(
            r#"
            INSERT INTO activities (
                id, or_period, title, description, held_at, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id, or_period, title, description, held_at, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            "#,
        )
        .bind(activity.id)
        .bind(&activity.or_period)
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(activity.held_at)
        .bind(activity.is_active)
        .bind(activity.audit.created_at)
        .bind(activity.audit.created_by)
        .bind(activity.audit.modified_at)
        .bind(activity.audit.modified_by)
        .bind(activity.audit.removed_at)
        .bind(activity.audit.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating activity: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }
}

#[async_trait]
impl AttendanceRepository for PgAttendanceRepository {
    async fn upsert(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, DomainError> {
        // A second recording for the same (activity, member) overwrites the first
        let row: AttendanceRow = sqlx::query_as(
            r#"
            INSERT INTO attendance_records (
                id, activity_id, member_id, status, note, recorded_at, recorded_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (activity_id, member_id) DO UPDATE
            SET
                status = EXCLUDED.status,
                note = EXCLUDED.note,
                recorded_at = EXCLUDED.recorded_at,
                recorded_by = EXCLUDED.recorded_by
            RETURNING id, activity_id, member_id, status, note, recorded_at, recorded_by
            "#,
        )
        .bind(record.id)
        .bind(record.activity_id)
        .bind(record.member_id)
        .bind(record.status.as_str())
        .bind(&record.note)
        .bind(record.recorded_at)
        .bind(record.recorded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error upserting attendance: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn list_by_period(&self, or_period: &str) -> Result<Vec<AttendanceRecord>, DomainError> {
        let rows: Vec<AttendanceRow> = sqlx::query_as(
            r#"
            SELECT
                r.id, r.activity_id, r.member_id, r.status, r.note, r.recorded_at, r.recorded_by
            FROM attendance_records r
            JOIN activities a ON a.id = r.activity_id
            WHERE a.or_period = $1 AND a.is_active AND a.removed_at IS NULL
            ORDER BY r.recorded_at, r.id
            "#,
        )
        .bind(or_period)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing attendance for period: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_by_member(&self, member_id: &Uuid) -> Result<Vec<AttendanceRecord>, DomainError> {
        let rows: Vec<AttendanceRow> = sqlx::query_as(
            r#"
            SELECT id, activity_id, member_id, status, note, recorded_at, recorded_by
            FROM attendance_records
            WHERE member_id = $1
            ORDER BY recorded_at, id
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing attendance for member: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
