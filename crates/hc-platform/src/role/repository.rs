//! Role Repository

use sqlx::SqlitePool;

use super::entity::{Role, RoleAssignment};
use crate::shared::error::Result;
use crate::usecase::{Aggregate, Detachable, SqliteQuery};

pub struct RoleRepository {
    pool: SqlitePool,
}

impl RoleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    pub async fn find_by_circle(&self, circle_id: &str) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT * FROM roles WHERE parent_circle_id = ? ORDER BY id",
        )
        .bind(circle_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    pub async fn find_by_partner(&self, partner_id: &str) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.* FROM roles r
            JOIN role_partners rp ON rp.role_id = r.id
            WHERE rp.partner_id = ?
            ORDER BY r.id
            "#,
        )
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    pub async fn is_assigned(&self, role_id: &str, partner_id: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM role_partners WHERE role_id = ? AND partner_id = ?",
        )
        .bind(role_id)
        .bind(partner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }
}

impl Aggregate for Role {
    fn aggregate_type(&self) -> &'static str {
        "Role"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO roles (
                id, name, purpose, role_type, parent_circle_id, circle_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                purpose = excluded.purpose,
                role_type = excluded.role_type,
                circle_id = excluded.circle_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.id)
        .bind(&self.name)
        .bind(&self.purpose)
        .bind(self.role_type)
        .bind(&self.parent_circle_id)
        .bind(&self.circle_id)
        .bind(self.created_at)
        .bind(self.updated_at)
    }
}

/// Hard delete; domains, policies, accountabilities and assignments follow
/// through `ON DELETE CASCADE`.
impl Detachable for Role {
    fn aggregate_type(&self) -> &'static str {
        "Role"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn remove(&self) -> SqliteQuery<'_> {
        sqlx::query("DELETE FROM roles WHERE id = ?").bind(&self.id)
    }
}

impl Aggregate for RoleAssignment {
    fn aggregate_type(&self) -> &'static str {
        "RoleAssignment"
    }

    fn aggregate_id(&self) -> String {
        format!("{}:{}", self.role_id, self.partner_id)
    }

    /// Idempotent on the pair key
    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            "INSERT OR IGNORE INTO role_partners (role_id, partner_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(&self.role_id)
        .bind(&self.partner_id)
        .bind(self.created_at)
    }
}

impl Detachable for RoleAssignment {
    fn aggregate_type(&self) -> &'static str {
        "RoleAssignment"
    }

    fn aggregate_id(&self) -> String {
        format!("{}:{}", self.role_id, self.partner_id)
    }

    fn remove(&self) -> SqliteQuery<'_> {
        sqlx::query("DELETE FROM role_partners WHERE role_id = ? AND partner_id = ?")
            .bind(&self.role_id)
            .bind(&self.partner_id)
    }
}
