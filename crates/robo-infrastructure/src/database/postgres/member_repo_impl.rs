// ============================================================================
// Robo Infrastructure - PostgreSQL Member Repository
// File: crates/robo-infrastructure/src/database/postgres/member_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use robo_core::domain::{Member, MemberRole};
use robo_core::error::DomainError;
use robo_core::repositories::MemberRepository;
use robo_shared::{AuditFields, Pagination};

pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct MemberRow {
    pub id: Uuid,
    pub full_name: String,
    pub nim: String,
    pub email: String,
    pub role: String,
    pub or_period: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member {
            id: row.id,
            full_name: row.full_name,
            nim: row.nim,
            email: row.email,
            role: MemberRole::from_str(&row.role).unwrap_or_default(),
            or_period: row.or_period,
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
impl MemberRepository for PgMemberRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Member>, DomainError> {
        let row: Option<MemberRow> = sqlx::query_as(
            r#"
            SELECT
                id, full_name, nim, email, role, or_period, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM members
            WHERE id = $1 AND removed_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding member by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_nim(&self, or_period: &str, nim: &str) -> Result<Option<Member>, DomainError> {
        let row: Option<MemberRow> = sqlx::query_as(
            r#"
            SELECT
                id, full_name, nim, email, role, or_period, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM members
            WHERE or_period = $1 AND nim = $2 AND removed_at IS NULL
            "#,
        )
        .bind(or_period)
        .bind(nim)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding member by nim: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_period(&self, or_period: &str, page: &Pagination) -> Result<Vec<Member>, DomainError> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            r#"
            SELECT
                id, full_name, nim, email, role, or_period, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM members
            WHERE or_period = $1 AND removed_at IS NULL
            ORDER BY full_name, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(or_period)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing members: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_eligible(&self, or_period: &str) -> Result<Vec<Member>, DomainError> {
        // Roster order; ranking ties resolve by this order
        let rows: Vec<MemberRow> = sqlx::query_as(
            r#"
            SELECT
                id, full_name, nim, email, role, or_period, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            FROM members
            WHERE or_period = $1 AND role = 'caang' AND is_active AND removed_at IS NULL
            ORDER BY full_name, id
            "#,
        )
        .bind(or_period)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing eligible members: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, member: &Member) -> Result<Member, DomainError> {
        info!("Creating member: {} ({})", member.nim, member.or_period);

        let row: MemberRow = sqlx::query_as(
            r#"
            INSERT INTO members (
                id, full_name, nim, email, role, or_period, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING
                id, full_name, nim, email, role, or_period, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            "#,
        )
        .bind(member.id)
        .bind(&member.full_name)
        .bind(&member.nim)
        .bind(&member.email)
        .bind(member.role.as_str())
        .bind(&member.or_period)
        .bind(member.is_active)
        .bind(member.audit.created_at)
        .bind(member.audit.created_by)
        .bind(member.audit.modified_at)
        .bind(member.audit.modified_by)
        .bind(member.audit.removed_at)
        .bind(member.audit.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating member: {}", e);
            match e.as_database_error() {
                Some(db) if db.is_unique_violation() => DomainError::NimAlreadyRegistered {
                    or_period: member.or_period.clone(),
                    nim: member.nim.clone(),
                },
                _ => DomainError::DatabaseError(e.to_string()),
            }
        })?;

        Ok(row.into())
    }

    async fn update(&self, member: &Member) -> Result<Member, DomainError> {
        let row: MemberRow = sqlx::query_as(
            r#"
            UPDATE members
            SET
                full_name = $2,
                email = $3,
                role = $4,
                is_active = $5,
                modified_at = $6,
                modified_by = $7,
                removed_at = $8,
                removed_by = $9
            WHERE id = $1
            RETURNING
                id, full_name, nim, email, role, or_period, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            "#,
        )
        .bind(member.id)
        .bind(&member.full_name)
        .bind(&member.email)
        .bind(member.role.as_str())
        .bind(member.is_active)
        .bind(member.audit.modified_at)
        .bind(member.audit.modified_by)
        .bind(member.audit.removed_at)
        .bind(member.audit.removed_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating member: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?
        .ok_or(DomainError::MemberNotFound(member.id))?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_falls_back_to_caang() {
        let row = MemberRow {
            id: Uuid::new_v4(),
            full_name: "Fajar Nugraha".into(),
            nim: "1301210010".into(),
            email: "fajar@robotik.ac.id".into(),
            role: "alumni".into(),
            or_period: "OR 21".into(),
            is_active: true,
            created_at: Utc::now(),
            created_by: None,
            modified_at: None,
            modified_by: None,
            removed_at: None,
            removed_by: None,
        };

        let member: Member = row.into();
        assert_eq!(member.role, MemberRole::Caang);
        assert!(member.is_eligible_in("OR 21"));
    }
}
