//! User Repository

use sqlx::SqlitePool;

use super::entity::{User, UserReactivation};
use crate::shared::error::Result;
use crate::usecase::{Aggregate, SqliteQuery, UseCaseError};

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Includes soft-deleted users
    pub async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = ?")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_active_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE external_id = ? AND is_deleted = 0",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

impl Aggregate for User {
    fn aggregate_type(&self) -> &'static str {
        "User"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO users (id, external_id, first_name, last_name, email, is_deleted, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email,
                is_deleted = excluded.is_deleted,
                updated_at = excluded.updated_at
            WHERE users.is_deleted = 0
            "#,
        )
        .bind(&self.id)
        .bind(&self.external_id)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.email)
        .bind(self.is_deleted)
        .bind(self.created_at)
        .bind(self.updated_at)
    }

    fn unmatched(&self) -> Option<UseCaseError> {
        Some(UseCaseError::not_found(
            "USER_NOT_FOUND",
            format!("User '{}' not found", self.id),
        ))
    }
}

impl Aggregate for UserReactivation {
    fn aggregate_type(&self) -> &'static str {
        "User"
    }

    fn aggregate_id(&self) -> String {
        self.0.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        let user = &self.0;
        sqlx::query(
            r#"
            UPDATE users SET
                first_name = ?, last_name = ?, email = ?, is_deleted = 0, updated_at = ?
            WHERE id = ? AND is_deleted = 1
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.updated_at)
        .bind(&user.id)
    }

    fn unmatched(&self) -> Option<UseCaseError> {
        Some(UseCaseError::already_exists(
            "USER_EXISTS",
            format!("User '{}' already exists", self.0.id),
        ))
    }
}
