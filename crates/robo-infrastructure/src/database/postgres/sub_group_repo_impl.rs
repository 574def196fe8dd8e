// ============================================================================
// Robo Infrastructure - PostgreSQL Sub-Group Repository
// File: crates/robo-infrastructure/src/database/postgres/sub_group_repo_impl.rs
// Description: Sub-group persistence; every write refreshes the parent's
//              counters inside the same transaction
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use robo_core::domain::{MemberSnapshot, SubGroup};
use robo_core::error::DomainError;
use robo_core::repositories::SubGroupRepository;

pub struct PgSubGroupRepository {
    pool: PgPool,
}

impl PgSubGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubGroupRow {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub name: String,
    pub position: i32,
    pub or_period: String,
    pub member_ids: Vec<Uuid>,
    pub leader_id: Option<Uuid>,
    pub members: Json<Vec<MemberSnapshot>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<SubGroupRow> for SubGroup {
    fn from(row: SubGroupRow) -> Self {
        SubGroup {
            id: row.id,
            parent_id: row.parent_id,
            name: row.name,
            position: row.position,
            or_period: row.or_period,
            member_ids: row.member_ids,
            leader_id: row.leader_id,
            members: row.members.0,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            modified_by: row.modified_by,
            removed_at: row.removed_at,
            removed_by: row.removed_by,
        }
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

/// Recount the parent's active sub-groups and their members.
const REFRESH_PARENT_COUNTERS: &str = r#"
    UPDATE groups g
    SET
        total_sub_groups = c.sub_groups,
        total_members = c.members,
        modified_at = NOW(),
        modified_by = $2
    FROM (
        SELECT
            COUNT(*)::INTEGER AS sub_groups,
            COALESCE(SUM(cardinality(member_ids)), 0)::INTEGER AS members
        FROM sub_groups
        WHERE parent_id = $1 AND removed_at IS NULL
    ) c
    WHERE g.id = $1
"#;

async fn refresh_parent_counters(
    conn: &mut PgConnection,
    parent_id: &Uuid,
    actor: Option<Uuid>,
) -> Result<(), DomainError> {
    sqlx::query(REFRESH_PARENT_COUNTERS)
        .bind(parent_id)
        .bind(actor)
        .execute(conn)
        .await
        .map_err(db_error("refreshing group counters"))?;

    Ok(())
}

#[async_trait]
impl SubGroupRepository for PgSubGroupRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<SubGroup>, DomainError> {
        let row: Option<SubGroupRow> = sqlx::query_as(
            r#"
            SELECT
                id, parent_id, name, position, or_period, member_ids, leader_id, members, is_active,
                created_at, updated_at, created_by, modified_by, removed_at, removed_by
            FROM sub_groups
            WHERE id = $1 AND removed_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding sub-group by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_parent(&self, parent_id: &Uuid) -> Result<Vec<SubGroup>, DomainError> {
        let rows: Vec<SubGroupRow> = sqlx::query_as(
            r#"
            SELECT
                id, parent_id, name, position, or_period, member_ids, leader_id, members, is_active,
                created_at, updated_at, created_by, modified_by, removed_at, removed_by
            FROM sub_groups
            WHERE parent_id = $1 AND removed_at IS NULL
            ORDER BY position, created_at
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing sub-groups"))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn replace_all(
        &self,
        parent_id: &Uuid,
        sub_groups: &[SubGroup],
        actor: &Uuid,
    ) -> Result<Vec<SubGroup>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("starting sub-group replace"))?;

        let replaced = sqlx::query(
            r#"
            UPDATE sub_groups
            SET is_active = FALSE, removed_at = NOW(), removed_by = $2, updated_at = NOW(), modified_by = $2
            WHERE parent_id = $1 AND removed_at IS NULL
            "#,
        )
        .bind(parent_id)
        .bind(actor)
        .execute(&mut *tx)
        .await
        .map_err(db_error("retiring previous sub-groups"))?
        .rows_affected();

        let mut saved = Vec::with_capacity(sub_groups.len());
        for sub_group in sub_groups {
            let row: SubGroupRow = sqlx::query_as(
                r#"
                INSERT INTO sub_groups (
                    id, parent_id, name, position, or_period, member_ids, leader_id, members, is_active,
                    created_at, updated_at, created_by, modified_by, removed_at, removed_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                RETURNING
                    id, parent_id, name, position, or_period, member_ids, leader_id, members, is_active,
                    created_at, updated_at, created_by, modified_by, removed_at, removed_by
                "#,
            )
            .bind(sub_group.id)
            .bind(parent_id)
            .bind(&sub_group.name)
            .bind(sub_group.position)
            .bind(&sub_group.or_period)
            .bind(&sub_group.member_ids)
            .bind(sub_group.leader_id)
            .bind(Json(&sub_group.members))
            .bind(sub_group.is_active)
            .bind(sub_group.created_at)
            .bind(sub_group.updated_at)
            .bind(sub_group.created_by)
            .bind(sub_group.modified_by)
            .bind(sub_group.removed_at)
            .bind(sub_group.removed_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("inserting sub-group"))?;

            saved.push(row.into());
        }

        refresh_parent_counters(&mut *tx, parent_id, Some(*actor)).await?;
        tx.commit().await.map_err(db_error("committing sub-group replace"))?;

        info!(
            "Replaced {} sub-groups of group {} with {}",
            replaced,
            parent_id,
            saved.len()
        );
        Ok(saved)
    }

    async fn update(&self, sub_group: &SubGroup) -> Result<SubGroup, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("starting sub-group update"))?;

        let row: SubGroupRow = sqlx::query_as(
            r#"
            UPDATE sub_groups
            SET
                name = $2,
                member_ids = $3,
                leader_id = $4,
                members = $5,
                is_active = $6,
                updated_at = $7,
                modified_by = $8,
                removed_at = $9,
                removed_by = $10
            WHERE id = $1
            RETURNING
                id, parent_id, name, position, or_period, member_ids, leader_id, members, is_active,
                created_at, updated_at, created_by, modified_by, removed_at, removed_by
            "#,
        )
        .bind(sub_group.id)
        .bind(&sub_group.name)
        .bind(&sub_group.member_ids)
        .bind(sub_group.leader_id)
        .bind(Json(&sub_group.members))
        .bind(sub_group.is_active)
        .bind(sub_group.updated_at)
        .bind(sub_group.modified_by)
        .bind(sub_group.removed_at)
        .bind(sub_group.removed_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("updating sub-group"))?
        .ok_or(DomainError::SubGroupNotFound(sub_group.id))?;

        refresh_parent_counters(&mut *tx, &row.parent_id, sub_group.modified_by).await?;
        tx.commit().await.map_err(db_error("committing sub-group update"))?;

        Ok(row.into())
    }
}
