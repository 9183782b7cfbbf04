//! Circle Repository

use sqlx::SqlitePool;

use super::entity::{Circle, CircleMembership};
use crate::shared::error::Result;
use crate::usecase::{Aggregate, Detachable, SqliteQuery, UseCaseError};

pub struct CircleRepository {
    pool: SqlitePool,
}

impl CircleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Circle>> {
        let circle = sqlx::query_as::<_, Circle>("SELECT * FROM circles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(circle)
    }

    pub async fn find_active(&self, id: &str) -> Result<Option<Circle>> {
        let circle = sqlx::query_as::<_, Circle>(
            "SELECT * FROM circles WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(circle)
    }

    pub async fn find_anchor(&self, organization_id: &str) -> Result<Option<Circle>> {
        let circle = sqlx::query_as::<_, Circle>(
            r#"
            SELECT * FROM circles
            WHERE organization_id = ? AND parent_circle_id IS NULL AND is_deleted = 0
            "#,
        )
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(circle)
    }

    pub async fn find_children(&self, parent_circle_id: &str) -> Result<Vec<Circle>> {
        let circles = sqlx::query_as::<_, Circle>(
            "SELECT * FROM circles WHERE parent_circle_id = ? AND is_deleted = 0 ORDER BY id",
        )
        .bind(parent_circle_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(circles)
    }

    pub async fn find_by_organization(&self, organization_id: &str) -> Result<Vec<Circle>> {
        let circles = sqlx::query_as::<_, Circle>(
            "SELECT * FROM circles WHERE organization_id = ? AND is_deleted = 0 ORDER BY id",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(circles)
    }

    pub async fn find_by_partner(&self, partner_id: &str) -> Result<Vec<Circle>> {
        let circles = sqlx::query_as::<_, Circle>(
            r#"
            SELECT c.* FROM circles c
            JOIN circle_partners cp ON cp.circle_id = c.id
            WHERE cp.partner_id = ? AND c.is_deleted = 0
            ORDER BY c.id
            "#,
        )
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(circles)
    }

    pub async fn is_member(&self, circle_id: &str, partner_id: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM circle_partners WHERE circle_id = ? AND partner_id = ?",
        )
        .bind(circle_id)
        .bind(partner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }
}

impl Aggregate for Circle {
    fn aggregate_type(&self) -> &'static str {
        "Circle"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO circles (
                id, name, purpose, is_deleted, organization_id, parent_circle_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                purpose = excluded.purpose,
                is_deleted = excluded.is_deleted,
                updated_at = excluded.updated_at
            WHERE circles.is_deleted = 0
            "#,
        )
        .bind(&self.id)
        .bind(&self.name)
        .bind(&self.purpose)
        .bind(self.is_deleted)
        .bind(&self.organization_id)
        .bind(&self.parent_circle_id)
        .bind(self.created_at)
        .bind(self.updated_at)
    }

    fn unmatched(&self) -> Option<UseCaseError> {
        Some(UseCaseError::not_found(
            "CIRCLE_NOT_FOUND",
            format!("Circle '{}' not found", self.id),
        ))
    }
}

impl Aggregate for CircleMembership {
    fn aggregate_type(&self) -> &'static str {
        "CircleMembership"
    }

    fn aggregate_id(&self) -> String {
        format!("{}:{}", self.circle_id, self.partner_id)
    }

    /// Idempotent on the pair key
    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            "INSERT OR IGNORE INTO circle_partners (circle_id, partner_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(&self.circle_id)
        .bind(&self.partner_id)
        .bind(self.created_at)
    }
}

impl Detachable for CircleMembership {
    fn aggregate_type(&self) -> &'static str {
        "CircleMembership"
    }

    fn aggregate_id(&self) -> String {
        format!("{}:{}", self.circle_id, self.partner_id)
    }

    fn remove(&self) -> SqliteQuery<'_> {
        sqlx::query("DELETE FROM circle_partners WHERE circle_id = ? AND partner_id = ?")
            .bind(&self.circle_id)
            .bind(&self.partner_id)
    }
}
