//! Role Entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RoleType {
    LeadLink,
    RepLink,
    Facilitator,
    Secretary,
    Circle,
    Custom,
}

impl RoleType {
    /// Roles every circle is bootstrapped with
    pub const CORE: [RoleType; 3] = [RoleType::LeadLink, RoleType::Secretary, RoleType::Facilitator];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::LeadLink => "lead_link",
            RoleType::RepLink => "rep_link",
            RoleType::Facilitator => "facilitator",
            RoleType::Secretary => "secretary",
            RoleType::Circle => "circle",
            RoleType::Custom => "custom",
        }
    }

    /// Types that can be created and deleted through the API
    pub fn is_elective(&self) -> bool {
        matches!(self, RoleType::Custom | RoleType::RepLink)
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            RoleType::LeadLink => "Lead Link",
            RoleType::RepLink => "Rep Link",
            RoleType::Facilitator => "Facilitator",
            RoleType::Secretary => "Secretary",
            RoleType::Circle => "Circle",
            RoleType::Custom => "Role",
        }
    }

    pub fn default_purpose(&self) -> Option<&'static str> {
        match self {
            RoleType::LeadLink => Some("The Lead Link holds the Purpose of the overall Circle"),
            RoleType::RepLink => Some(
                "Within the Super-Circle, the Purpose of the Sub-Circle is expressed and its tensions are processed",
            ),
            RoleType::Facilitator => Some(
                "Circle governance and operational practices aligned with the Constitution",
            ),
            RoleType::Secretary => Some(
                "Stabilize the Circle's constitutionally-required records and meetings",
            ),
            RoleType::Circle | RoleType::Custom => None,
        }
    }
}

impl Default for RoleType {
    fn default() -> Self {
        Self::Custom
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lead_link" => Ok(RoleType::LeadLink),
            "rep_link" => Ok(RoleType::RepLink),
            "facilitator" => Ok(RoleType::Facilitator),
            "secretary" => Ok(RoleType::Secretary),
            "circle" => Ok(RoleType::Circle),
            "custom" => Ok(RoleType::Custom),
            other => Err(format!("Unknown role type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    pub purpose: Option<String>,
    pub role_type: RoleType,

    /// Circle the role lives in
    pub parent_circle_id: Option<String>,

    /// Sub-circle this role stands for; set only for `circle` roles
    pub circle_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn new(parent_circle_id: &str, name: &str, purpose: Option<String>, role_type: RoleType) -> Self {
        let now = Utc::now();
        Self {
            id: TsidGenerator::generate(),
            name: name.to_string(),
            purpose,
            role_type,
            parent_circle_id: Some(parent_circle_id.to_string()),
            circle_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Core role with its standard name and purpose
    pub fn core(parent_circle_id: &str, role_type: RoleType) -> Self {
        Self::new(
            parent_circle_id,
            role_type.default_name(),
            role_type.default_purpose().map(String::from),
            role_type,
        )
    }

    /// Turn this role into the representative of `circle_id`
    pub fn expand_into(&mut self, circle_id: &str) {
        self.role_type = RoleType::Circle;
        self.circle_id = Some(circle_id.to_string());
        self.updated_at = Utc::now();
    }
}

/// Partner assignment to a role, keyed on the pair
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub role_id: String,
    pub partner_id: String,
    pub created_at: DateTime<Utc>,
}

impl RoleAssignment {
    pub fn new(role_id: &str, partner_id: &str) -> Self {
        Self {
            role_id: role_id.to_string(),
            partner_id: partner_id.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_roles_have_standard_names() {
        let names: Vec<&str> = RoleType::CORE.iter().map(|t| t.default_name()).collect();
        assert_eq!(names, vec!["Lead Link", "Secretary", "Facilitator"]);

        let lead = Role::core("C1", RoleType::LeadLink);
        assert_eq!(lead.name, "Lead Link");
        assert!(lead.purpose.is_some());
        assert_eq!(lead.parent_circle_id.as_deref(), Some("C1"));
        assert!(lead.circle_id.is_none());
    }

    #[test]
    fn test_role_type_parsing() {
        assert_eq!("rep_link".parse::<RoleType>(), Ok(RoleType::RepLink));
        assert_eq!(" Custom ".parse::<RoleType>(), Ok(RoleType::Custom));
        assert!("owner".parse::<RoleType>().is_err());
        assert_eq!(RoleType::LeadLink.to_string(), "lead_link");
    }

    #[test]
    fn test_elective_types() {
        assert!(RoleType::Custom.is_elective());
        assert!(RoleType::RepLink.is_elective());
        assert!(!RoleType::LeadLink.is_elective());
        assert!(!RoleType::Circle.is_elective());
    }

    #[test]
    fn test_expand_into() {
        let mut role = Role::new("C1", "Marketing", None, RoleType::Custom);
        role.expand_into("C2");
        assert_eq!(role.role_type, RoleType::Circle);
        assert_eq!(role.circle_id.as_deref(), Some("C2"));
    }
}
