//! Partner Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::tsid::TsidGenerator;
use crate::user::User;

/// Privilege tag within the organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PartnerType {
    Admin,
    Member,
}

impl Default for PartnerType {
    fn default() -> Self {
        Self::Member
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub partner_type: PartnerType,

    /// Snapshot of the user's profile at join time
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,

    pub is_active: bool,
    pub is_deleted: bool,

    pub user_id: String,
    pub organization_id: String,

    /// Invitation this partner joined through, if any
    pub invitation_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partner {
    pub fn for_user(user: &User, organization_id: &str, partner_type: PartnerType) -> Self {
        let now = Utc::now();
        Self {
            id: TsidGenerator::generate(),
            partner_type,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            is_active: true,
            is_deleted: false,
            user_id: user.id.clone(),
            organization_id: organization_id.to_string(),
            invitation_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_invitation(mut self, invitation_id: &str) -> Self {
        self.invitation_id = Some(invitation_id.to_string());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.partner_type == PartnerType::Admin
    }

    /// Bring back a soft-deleted partner as a fresh member
    pub fn revive(&mut self, user: &User, invitation_id: &str) {
        self.partner_type = PartnerType::Member;
        self.first_name = user.first_name.clone();
        self.last_name = user.last_name.clone();
        self.email = user.email.clone();
        self.is_active = true;
        self.is_deleted = false;
        self.invitation_id = Some(invitation_id.to_string());
        self.updated_at = Utc::now();
    }

    pub fn set_type(&mut self, partner_type: PartnerType) {
        self.partner_type = partner_type;
        self.updated_at = Utc::now();
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.updated_at = Utc::now();
    }
}

/// A soft-deleted partner brought back by an accepted invitation.
///
/// The plain partner upsert never touches a deleted row, so revival is its
/// own statement.
#[derive(Debug, Clone)]
pub struct PartnerRevival(pub Partner);

/// Soft delete of every partner under an organization or a user
#[derive(Debug, Clone)]
pub enum PartnerCascade {
    Organization(String),
    User(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ExternalIdentity;

    fn user() -> User {
        User::from_identity(
            &ExternalIdentity::new("auth0|carol", "carol@example.com").with_name("Carol", "Jones"),
        )
    }

    #[test]
    fn test_for_user_snapshots_profile() {
        let user = user();
        let partner = Partner::for_user(&user, "ORG1", PartnerType::Admin);
        assert_eq!(partner.email, "carol@example.com");
        assert_eq!(partner.first_name.as_deref(), Some("Carol"));
        assert!(partner.is_admin());
        assert!(partner.is_active);
        assert!(partner.invitation_id.is_none());
    }

    #[test]
    fn test_revive_resets_to_member() {
        let user = user();
        let mut partner = Partner::for_user(&user, "ORG1", PartnerType::Admin);
        partner.soft_delete();

        partner.revive(&user, "INV1");
        assert!(!partner.is_deleted);
        assert_eq!(partner.partner_type, PartnerType::Member);
        assert_eq!(partner.invitation_id.as_deref(), Some("INV1"));
    }
}
