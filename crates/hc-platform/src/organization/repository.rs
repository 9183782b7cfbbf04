//! Organization Repository

use sqlx::SqlitePool;

use super::entity::Organization;
use crate::shared::error::Result;
use crate::usecase::{Aggregate, SqliteQuery, UseCaseError};

pub struct OrganizationRepository {
    pool: SqlitePool,
}

impl OrganizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Organization>> {
        let org = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(org)
    }

    pub async fn find_active(&self, id: &str) -> Result<Option<Organization>> {
        let org = sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(org)
    }

    /// Live organizations where the user holds a live partner
    pub async fn find_for_user(&self, user_id: &str) -> Result<Vec<Organization>> {
        let orgs = sqlx::query_as::<_, Organization>(
            r#"
            SELECT o.* FROM organizations o
            JOIN partners p ON p.organization_id = o.id
            WHERE p.user_id = ? AND p.is_deleted = 0 AND o.is_deleted = 0
            ORDER BY o.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orgs)
    }
}

impl Aggregate for Organization {
    fn aggregate_type(&self) -> &'static str {
        "Organization"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO organizations (id, name, is_deleted, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                is_deleted = excluded.is_deleted,
                updated_at = excluded.updated_at
            WHERE organizations.is_deleted = 0
            "#,
        )
        .bind(&self.id)
        .bind(&self.name)
        .bind(self.is_deleted)
        .bind(self.created_at)
        .bind(self.updated_at)
    }

    /// Deleted organizations are never written again.
    fn unmatched(&self) -> Option<UseCaseError> {
        Some(UseCaseError::not_found(
            "ORGANIZATION_NOT_FOUND",
            format!("Organization '{}' not found", self.id),
        ))
    }
}
