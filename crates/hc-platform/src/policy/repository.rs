//! Policy Repository

use sqlx::SqlitePool;

use super::entity::Policy;
use crate::shared::error::Result;
use crate::usecase::{Aggregate, Detachable, SqliteQuery};

pub struct PolicyRepository {
    pool: SqlitePool,
}

impl PolicyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Policy>> {
        let policy = sqlx::query_as::<_, Policy>("SELECT * FROM policies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(policy)
    }

    pub async fn find_by_domain(&self, domain_id: &str) -> Result<Vec<Policy>> {
        let policies = sqlx::query_as::<_, Policy>(
            "SELECT * FROM policies WHERE domain_id = ? ORDER BY id",
        )
        .bind(domain_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(policies)
    }
}

impl Aggregate for Policy {
    fn aggregate_type(&self) -> &'static str {
        "Policy"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO policies (id, title, description, domain_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(&self.domain_id)
        .bind(self.created_at)
        .bind(self.updated_at)
    }
}

impl Detachable for Policy {
    fn aggregate_type(&self) -> &'static str {
        "Policy"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn remove(&self) -> SqliteQuery<'_> {
        sqlx::query("DELETE FROM policies WHERE id = ?").bind(&self.id)
    }
}
