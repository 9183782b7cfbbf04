//! Partner Repository

use sqlx::SqlitePool;

use super::entity::{Partner, PartnerCascade, PartnerRevival};
use crate::shared::error::Result;
use crate::usecase::{Aggregate, SqliteQuery, UseCaseError};

pub struct PartnerRepository {
    pool: SqlitePool,
}

impl PartnerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Partner>> {
        let partner = sqlx::query_as::<_, Partner>("SELECT * FROM partners WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(partner)
    }

    pub async fn find_active(&self, id: &str) -> Result<Option<Partner>> {
        let partner = sqlx::query_as::<_, Partner>(
            "SELECT * FROM partners WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(partner)
    }

    /// Includes soft-deleted partners
    pub async fn find_by_user_and_organization(
        &self,
        user_id: &str,
        organization_id: &str,
    ) -> Result<Option<Partner>> {
        let partner = sqlx::query_as::<_, Partner>(
            "SELECT * FROM partners WHERE user_id = ? AND organization_id = ?",
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(partner)
    }

    pub async fn find_by_organization(&self, organization_id: &str) -> Result<Vec<Partner>> {
        let partners = sqlx::query_as::<_, Partner>(
            "SELECT * FROM partners WHERE organization_id = ? AND is_deleted = 0 ORDER BY id",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(partners)
    }

    pub async fn find_admins(&self, organization_id: &str) -> Result<Vec<Partner>> {
        let partners = sqlx::query_as::<_, Partner>(
            r#"
            SELECT * FROM partners
            WHERE organization_id = ? AND is_deleted = 0 AND partner_type = 'admin'
            ORDER BY id
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(partners)
    }

    pub async fn find_by_circle(&self, circle_id: &str) -> Result<Vec<Partner>> {
        let partners = sqlx::query_as::<_, Partner>(
            r#"
            SELECT p.* FROM partners p
            JOIN circle_partners cp ON cp.partner_id = p.id
            WHERE cp.circle_id = ? AND p.is_deleted = 0
            ORDER BY p.id
            "#,
        )
        .bind(circle_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(partners)
    }

    pub async fn find_by_role(&self, role_id: &str) -> Result<Vec<Partner>> {
        let partners = sqlx::query_as::<_, Partner>(
            r#"
            SELECT p.* FROM partners p
            JOIN role_partners rp ON rp.partner_id = p.id
            WHERE rp.role_id = ? AND p.is_deleted = 0
            ORDER BY p.id
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(partners)
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Partner>> {
        let partners = sqlx::query_as::<_, Partner>(
            "SELECT * FROM partners WHERE user_id = ? AND is_deleted = 0 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(partners)
    }
}

impl Aggregate for Partner {
    fn aggregate_type(&self) -> &'static str {
        "Partner"
    }

    fn aggregate_id(&self) -> String {
        self.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        sqlx::query(
            r#"
            INSERT INTO partners (
                id, partner_type, first_name, last_name, email, is_active, is_deleted,
                user_id, organization_id, invitation_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                partner_type = excluded.partner_type,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email,
                is_active = excluded.is_active,
                is_deleted = excluded.is_deleted,
                invitation_id = excluded.invitation_id,
                updated_at = excluded.updated_at
            WHERE partners.is_deleted = 0
            "#,
        )
        .bind(&self.id)
        .bind(self.partner_type)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.email)
        .bind(self.is_active)
        .bind(self.is_deleted)
        .bind(&self.user_id)
        .bind(&self.organization_id)
        .bind(&self.invitation_id)
        .bind(self.created_at)
        .bind(self.updated_at)
    }

    /// Updates and soft delete only apply to a live row; a cascade that
    /// committed in between wins.
    fn unmatched(&self) -> Option<UseCaseError> {
        Some(UseCaseError::not_found(
            "PARTNER_NOT_FOUND",
            format!("Partner '{}' not found", self.id),
        ))
    }
}

impl Aggregate for PartnerRevival {
    fn aggregate_type(&self) -> &'static str {
        "Partner"
    }

    fn aggregate_id(&self) -> String {
        self.0.id.clone()
    }

    fn save(&self) -> SqliteQuery<'_> {
        let partner = &self.0;
        sqlx::query(
            r#"
            UPDATE partners SET
                partner_type = ?, first_name = ?, last_name = ?, email = ?,
                is_active = 1, is_deleted = 0, invitation_id = ?, updated_at = ?
            WHERE id = ? AND is_deleted = 1
            "#,
        )
        .bind(partner.partner_type)
        .bind(&partner.first_name)
        .bind(&partner.last_name)
        .bind(&partner.email)
        .bind(&partner.invitation_id)
        .bind(partner.updated_at)
        .bind(&partner.id)
    }

    fn unmatched(&self) -> Option<UseCaseError> {
        Some(UseCaseError::already_exists(
            "PARTNER_EXISTS",
            format!("Partner '{}' is already active", self.0.id),
        ))
    }
}

impl Aggregate for PartnerCascade {
    fn aggregate_type(&self) -> &'static str {
        "Partner"
    }

    fn aggregate_id(&self) -> String {
        match self {
            PartnerCascade::Organization(id) | PartnerCascade::User(id) => id.clone(),
        }
    }

    fn save(&self) -> SqliteQuery<'_> {
        let statement = match self {
            PartnerCascade::Organization(_) => {
                "UPDATE partners SET is_deleted = 1, updated_at = ? WHERE organization_id = ? AND is_deleted = 0"
            }
            PartnerCascade::User(_) => {
                "UPDATE partners SET is_deleted = 1, updated_at = ? WHERE user_id = ? AND is_deleted = 0"
            }
        };
        let (PartnerCascade::Organization(id) | PartnerCascade::User(id)) = self;
        sqlx::query(statement).bind(chrono::Utc::now()).bind(id)
    }
}
