//! Accountability Repository

use sqlx::SqlitePool;

use super::entity::Accountability;
use crate::shared::error::Result;
use crate::usecase::{Aggregate, Detachable, SqliteQuery};

pub struct AccountabilityRepository {
    pool: SqlitePool,
}

impl AccountabilityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Accountability>> {
        let accountability =
            sqlx::query_as::<_, Accountability>("SELECT * FROM accountabilities WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(accountability)
    }

    pub async fn find_by_role(&self, role_id: &str) -> Result<Vec<Accountability>> {
        let accountabilities = sqlx::query_as::<_, Accountability>(
            "SELECT * FROM accountabilities WHERE role_id = ? ORDER BY id",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(accountabilities)
    }
}

impl Aggregate for Accountability {
    fn aggregate_type(&self) -> &'static str {
        "Accountability"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO accountabilities (id, title, role_id, created_at, updated_at)
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

impl Detachable for Accountability {
    fn aggregate_type(&self) -> &'static str {
        "Accountability"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn remove(&self) -> SqliteQuery<'_> {
        sqlx::query("DELETE FROM accountabilities WHERE id = ?").bind(&self.id)
    }
}
