//! User Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::ExternalIdentity;
use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    /// Subject id at the identity provider
    pub external_id: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,

    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A soft-deleted user registering again; see [`User::reactivate`].
#[derive(Debug, Clone)]
pub struct UserReactivation(pub User);

impl User {
    pub fn from_identity(identity: &ExternalIdentity) -> Self {
        let now = Utc::now();
        Self {
            id: TsidGenerator::generate(),
            external_id: identity.external_id.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            email: identity.email.clone(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Undo a soft delete, refreshing the profile from the identity
    pub fn reactivate(&mut self, identity: &ExternalIdentity) {
        self.is_deleted = false;
        self.first_name = identity.first_name.clone();
        self.last_name = identity.last_name.clone();
        self.email = identity.email.clone();
        self.updated_at = Utc::now();
    }

    pub fn rename(&mut self, first_name: Option<String>, last_name: Option<String>) {
        if first_name.is_some() {
            self.first_name = first_name;
        }
        if last_name.is_some() {
            self.last_name = last_name;
        }
        self.updated_at = Utc::now();
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reactivate_refreshes_profile() {
        let identity = ExternalIdentity::new("auth0|alice", "alice@example.com");
        let mut user = User::from_identity(&identity);
        user.soft_delete();
        assert!(!user.is_active());

        let renamed = identity.with_name("Alice", "Liddell");
        user.reactivate(&renamed);
        assert!(user.is_active());
        assert_eq!(user.first_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_rename_keeps_missing_fields() {
        let identity = ExternalIdentity::new("auth0|bob", "bob@example.com").with_name("Bob", "Smith");
        let mut user = User::from_identity(&identity);
        user.rename(Some("Robert".to_string()), None);
        assert_eq!(user.first_name.as_deref(), Some("Robert"));
        assert_eq!(user.last_name.as_deref(), Some("Smith"));
    }
}
