//! Invitation Repository

use sqlx::SqlitePool;

use super::entity::Invitation;
use crate::shared::error::Result;
use crate::usecase::{Aggregate, SqliteQuery, UseCaseError};

pub struct InvitationRepository {
    pool: SqlitePool,
}

impl InvitationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Invitation>> {
        let invitation = sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(invitation)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Invitation>> {
        let invitation = sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(invitation)
    }

    pub async fn find_by_organization(&self, organization_id: &str) -> Result<Vec<Invitation>> {
        let invitations = sqlx::query_as::<_, Invitation>(
            "SELECT * FROM invitations WHERE organization_id = ? ORDER BY id",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(invitations)
    }
}

impl Aggregate for Invitation {
    fn aggregate_type(&self) -> &'static str {
        "Invitation"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO invitations (id, code, email, status, organization_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                updated_at = excluded.updated_at
            WHERE invitations.status = 'pending'
            "#,
        )
        .bind(&self.id)
        .bind(&self.code)
        .bind(&self.email)
        .bind(self.status)
        .bind(&self.organization_id)
        .bind(self.created_at)
        .bind(self.updated_at)
    }

    /// Status only moves out of pending; a concurrent accept or cancel that
    /// committed first leaves nothing to update.
    fn unmatched(&self) -> Option<UseCaseError> {
        Some(UseCaseError::business_rule(
            "INVITATION_NOT_PENDING",
            format!("Invitation '{}' is no longer pending", self.id),
        ))
    }
}
