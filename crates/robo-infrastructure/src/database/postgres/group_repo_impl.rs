// ============================================================================
// Robo Infrastructure - PostgreSQL Group Repository
// File: crates/robo-infrastructure/src/database/postgres/group_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use robo_core::domain::Group;
use robo_core::error::DomainError;
use robo_core::repositories::GroupRepository;
use robo_shared::AuditFields;

pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GroupRow {
    pub id: Uuid,
    pub or_period: String,
    pub name: String,
    pub description: Option<String>,
    pub total_sub_groups: i32,
    pub total_members: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            or_period: row.or_period,
            name: row.name,
            description: row.description,
            total_sub_groups: row.total_sub_groups,
            total_members: row.total_members,
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

#[async_trait]
impl GroupRepository for PgGroupRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Group>, DomainError> {
        let row: Option<GroupRow> = sqlx::query_as(
            r#"
            SELECT
                id, or_period, name, description, total_sub_groups, total_members, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM groups
            WHERE id = $1 AND removed_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding group by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_name(&self, or_period: &str, name: &str) -> Result<Option<Group>, DomainError> {
        let row: Option<GroupRow> = sqlx::query_as(
            r#"
            SELECT
                id, or_period, name, description, total_sub_groups, total_members, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM groups
            WHERE or_period = $1 AND LOWER(name) = LOWER($2) AND removed_at IS NULL
            "#,
        )
        .bind(or_period)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding group by name: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_period(&self, or_period: &str) -> Result<Vec<Group>, DomainError> {
        let rows: Vec<GroupRow> = sqlx::query_as(
            r#"
            SELECT
                id, or_period, name, description, total_sub_groups, total_members, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM groups
            WHERE or_period = $1 AND removed_at IS NULL
            ORDER BY created_at, name
            "#,
        )
        .bind(or_period)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing groups: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, group: &Group) -> Result<Group, DomainError> {
        info!("Creating group: {} ({})", group.name, group.or_period);

        let row: GroupRow = sqlx::query_as(
            r#"
            INSERT INTO groups (
                id, or_period, name, description, total_sub_groups, total_members, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING
                id, or_period, name, description, total_sub_groups, total_members, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            "#,
        )
        .bind(group.id)
        .bind(&group.or_period)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.total_sub_groups)
        .bind(group.total_members)
        .bind(group.is_active)
        .bind(group.audit.created_at)
        .bind(group.audit.created_by)
        .bind(group.audit.modified_at)
        .bind(group.audit.modified_by)
        .bind(group.audit.removed_at)
        .bind(group.audit.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating group: {}", e);
            match e.as_database_error() {
                Some(db) if db.is_unique_violation() => DomainError::GroupNameAlreadyExists {
                    or_period: group.or_period.clone(),
                    name: group.name.clone(),
                },
                _ => DomainError::DatabaseError(e.to_string()),
            }
        })?;

        Ok(row.into())
    }

    async fn soft_delete(&self, group: &Group) -> Result<(), DomainError> {
        let removed_at = group.audit.removed_at.unwrap_or_else(Utc::now);
        let removed_by = group.audit.removed_by;

        let mut tx = self.pool.begin().await.map_err(|e: sqlx::Error| {
            error!("Database error starting group delete: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        sqlx::query(
            r#"
            UPDATE sub_groups
            SET is_active = FALSE, removed_at = $2, removed_by = $3, updated_at = $2, modified_by = $3
            WHERE parent_id = $1 AND removed_at IS NULL
            "#,
        )
        .bind(group.id)
        .bind(removed_at)
        .bind(removed_by)
        .execute(&mut *tx)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting sub-groups of group {}: {}", group.id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let result = sqlx::query(
            r#"
            UPDATE groups
            SET
                is_active = FALSE,
                total_sub_groups = 0,
                total_members = 0,
                modified_at = $2,
                modified_by = $3,
                removed_at = $2,
                removed_by = $3
            WHERE id = $1 AND removed_at IS NULL
            "#,
        )
        .bind(group.id)
        .bind(removed_at)
        .bind(removed_by)
        .execute(&mut *tx)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting group {}: {}", group.id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GroupNotFound(group.id));
        }

        tx.commit().await.map_err(|e: sqlx::Error| {
            error!("Database error committing group delete: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        info!("Group {} and its sub-groups soft-deleted", group.id);
        Ok(())
    }
}
