//! Circle Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub id: String,
    pub name: String,
    pub purpose: Option<String>,
    pub is_deleted: bool,
    pub organization_id: String,

    /// None only for the anchor circle
    pub parent_circle_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Circle {
    pub fn anchor(organization_id: &str, name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: TsidGenerator::generate(),
            name: name.to_string(),
            purpose: None,
            is_deleted: false,
            organization_id: organization_id.to_string(),
            parent_circle_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// New circle under `parent`, in the parent's organization
    pub fn child_of(parent: &Circle, name: &str, purpose: Option<String>) -> Self {
        let mut circle = Self::anchor(&parent.organization_id, name);
        circle.parent_circle_id = Some(parent.id.clone());
        circle.purpose = purpose;
        circle
    }

    pub fn is_anchor(&self) -> bool {
        self.parent_circle_id.is_none()
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.updated_at = Utc::now();
    }
}

/// Partner membership in a circle, keyed on the pair
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CircleMembership {
    pub circle_id: String,
    pub partner_id: String,
    pub created_at: DateTime<Utc>,
}

impl CircleMembership {
    pub fn new(circle_id: &str, partner_id: &str) -> Self {
        Self {
            circle_id: circle_id.to_string(),
            partner_id: partner_id.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_inherits_organization() {
        let anchor = Circle::anchor("ORG1", "Acme");
        assert!(anchor.is_anchor());

        let child = Circle::child_of(&anchor, "Engineering", Some("Ship it".to_string()));
        assert!(!child.is_anchor());
        assert_eq!(child.organization_id, "ORG1");
        assert_eq!(child.parent_circle_id.as_deref(), Some(anchor.id.as_str()));
        assert_ne!(child.id, anchor.id);
    }
}
