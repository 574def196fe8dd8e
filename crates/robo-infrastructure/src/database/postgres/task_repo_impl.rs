// ============================================================================
// Robo Infrastructure - PostgreSQL Task Repository
// File: crates/robo-infrastructure/src/database/postgres/task_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use robo_core::domain::{Task, TaskSubmission};
use robo_core::error::DomainError;
use robo_core::repositories::TaskRepository;
use robo_shared::AuditFields;

pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    pub id: Uuid,
    pub or_period: String,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub max_score: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            or_period: row.or_period,
            title: row.title,
            description: row.description,
            due_at: row.due_at,
            max_score: row.max_score,
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
struct SubmissionRow {
    pub id: Uuid,
    pub task_id: Uuid,
    pub member_id: Uuid,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
    pub is_late: bool,
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
    pub graded_by: Option<Uuid>,
}

impl From<SubmissionRow> for TaskSubmission {
    fn from(row: SubmissionRow) -> Self {
        TaskSubmission {
            id: row.id,
            task_id: row.task_id,
            member_id: row.member_id,
            content: row.content,
            submitted_at: row.submitted_at,
            is_late: row.is_late,
            score: row.score,
            feedback: row.feedback,
            graded_at: row.graded_at,
            graded_by: row.graded_by,
        }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create_task(&self, task: &Task) -> Result<Task, DomainError> {
        info!("Creating task: {} ({})", task.title, task.or_period);

        let row: TaskRow = sqlx::query_as(
            r#"
            INSERT INTO tasks (
                id, or_period, title, description, due_at, max_score, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING
                id, or_period, title, description, due_at, max_score, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            "#,
        )
        .bind(task.id)
        .bind(&task.or_period)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_at)
        .bind(task.max_score)
        .bind(task.is_active)
        .bind(task.audit.created_at)
        .bind(task.audit.created_by)
        .bind(task.audit.modified_at)
        .bind(task.audit.modified_by)
        .bind(task.audit.removed_at)
        .bind(task.audit.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating task: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn find_task(&self, id: &Uuid) -> Result<Option<Task>, DomainError> {
        let row: Option<TaskRow> = sqlx::query_as(
            r#"
            SELECT
                id, or_period, title, description, due_at, max_score, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM tasks
            WHERE id = $1 AND removed_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding task by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_tasks(&self, or_period: &str) -> Result<Vec<Task>, DomainError> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"
            SELECT
                id, or_period, title, description, due_at, max_score, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM tasks
            WHERE or_period = $1 AND removed_at IS NULL
            ORDER BY due_at, id
            "#,
        )
        .bind(or_period)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing tasks: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn find_submission(&self, id: &Uuid) -> Result<Option<TaskSubmission>, DomainError> {
        let row: Option<SubmissionRow> = sqlx::query_as(
            r#"
            SELECT
                id, task_id, member_id, content, submitted_at, is_late,
                score, feedback, graded_at, graded_by
            FROM task_submissions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding submission by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_member_submission(
        &self,
        task_id: &Uuid,
        member_id: &Uuid,
    ) -> Result<Option<TaskSubmission>, DomainError> {
        let row: Option<SubmissionRow> = sqlx::query_as(
            r#"
            SELECT
                id, task_id, member_id, content, submitted_at, is_late,
                score, feedback, graded_at, graded_by
            FROM task_submissions
            WHERE task_id = $1 AND member_id = $2
            "#,
        )
        .bind(task_id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding member submission: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn save_submission(&self, submission: &TaskSubmission) -> Result<TaskSubmission, DomainError> {
        let row: SubmissionRow = sqlx::query_as(
            r#"
            INSERT INTO task_submissions (
                id, task_id, member_id, content, submitted_at, is_late,
                score, feedback, graded_at, graded_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET
                content = EXCLUDED.content,
                submitted_at = EXCLUDED.submitted_at,
                is_late = EXCLUDED.is_late,
                score = EXCLUDED.score,
                feedback = EXCLUDED.feedback,
                graded_at = EXCLUDED.graded_at,
                graded_by = EXCLUDED.graded_by
            RETURNING
                id, task_id, member_id, content, submitted_at, is_late,
                score, feedback, graded_at, graded_by
            "#,
        )
        .bind(submission.id)
        .bind(submission.task_id)
        .bind(submission.member_id)
        .bind(&submission.content)
        .bind(submission.submitted_at)
        .bind(submission.is_late)
        .bind(submission.score)
        .bind(&submission.feedback)
        .bind(submission.graded_at)
        .bind(submission.graded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error saving submission: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn list_submissions(&self, task_id: &Uuid) -> Result<Vec<TaskSubmission>, DomainError> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(
            r#"
            SELECT
                id, task_id, member_id, content, submitted_at, is_late,
                score, feedback, graded_at, graded_by
            FROM task_submissions
            WHERE task_id = $1
            ORDER BY submitted_at, id
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing submissions: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
