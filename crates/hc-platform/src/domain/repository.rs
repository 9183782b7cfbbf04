//! Domain Repository

use sqlx::SqlitePool;

use super::entity::Domain;
use crate::shared::error::Result;
use crate::usecase::{Aggregate, Detachable, SqliteQuery};

pub struct DomainRepository {
    pool: SqlitePool,
}

impl DomainRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Domain>> {
        let domain = sqlx::query_as::<_, Domain>("SELECT * FROM domains WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(domain)
    }

    pub async fn find_by_role(&self, role_id: &str) -> Result<Vec<Domain>> {
        let domains = sqlx::query_as::<_, Domain>(
            "SELECT * FROM domains WHERE role_id = ? ORDER BY id",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(domains)
    }
}

impl Aggregate for Domain {
    fn aggregate_type(&self) -> &'static str {
        "Domain"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO domains (id, title, role_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.id)
        .bind(&self.title)
        .bind(&self.role_id)
        .bind(self.created_at)
        .bind(self.updated_at)
    }
}

/// Policies follow through `ON DELETE CASCADE`.
impl Detachable for Domain {
    fn aggregate_type(&self) -> &'static str {
        "Domain"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn remove(&self) -> SqliteQuery<'_> {
        sqlx::query("DELETE FROM domains WHERE id = ?").bind(&self.id)
    }
}
