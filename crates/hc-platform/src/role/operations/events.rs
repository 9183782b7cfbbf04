//! Role Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::role::RoleType;
use crate::usecase::{EventMetadata, ExecutionContext};

const SOURCE: &str = "holacracy:governance";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCreated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub role_id: String,
    pub circle_id: String,
    pub name: String,
    pub role_type: RoleType,
}

impl_domain_event!(RoleCreated);

impl RoleCreated {
    const EVENT_TYPE: &'static str = "holacracy:governance:role:created";

    pub fn new(ctx: &ExecutionContext, role_id: &str, circle_id: &str, name: &str, role_type: RoleType) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "role", role_id),
            role_id: role_id.to_string(),
            circle_id: circle_id.to_string(),
            name: name.to_string(),
            role_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub role_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl_domain_event!(RoleUpdated);

impl RoleUpdated {
    const EVENT_TYPE: &'static str = "holacracy:governance:role:updated";

    pub fn new(ctx: &ExecutionContext, role_id: &str, name: &str, purpose: Option<&str>) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "role", role_id),
            role_id: role_id.to_string(),
            name: name.to_string(),
            purpose: purpose.map(String::from),
        }
    }
}

/// Event emitted when a role is hard-deleted with its domains,
/// accountabilities and assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDeleted {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub role_id: String,
}

impl_domain_event!(RoleDeleted);

impl RoleDeleted {
    const EVENT_TYPE: &'static str = "holacracy:governance:role:deleted";

    pub fn new(ctx: &ExecutionContext, role_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "role", role_id),
            role_id: role_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMemberAdded {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub role_id: String,
    pub partner_id: String,
}

impl_domain_event!(RoleMemberAdded);

impl RoleMemberAdded {
    const EVENT_TYPE: &'static str = "holacracy:governance:role:member-added";

    pub fn new(ctx: &ExecutionContext, role_id: &str, partner_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "role", role_id),
            role_id: role_id.to_string(),
            partner_id: partner_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMemberRemoved {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub role_id: String,
    pub partner_id: String,
}

impl_domain_event!(RoleMemberRemoved);

impl RoleMemberRemoved {
    const EVENT_TYPE: &'static str = "holacracy:governance:role:member-removed";

    pub fn new(ctx: &ExecutionContext, role_id: &str, partner_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "role", role_id),
            role_id: role_id.to_string(),
            partner_id: partner_id.to_string(),
        }
    }
}

/// Event emitted when a role becomes a sub-circle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleExpanded {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub role_id: String,
    pub circle_id: String,
}

impl_domain_event!(RoleExpanded);

impl RoleExpanded {
    const EVENT_TYPE: &'static str = "holacracy:governance:role:expanded";

    pub fn new(ctx: &ExecutionContext, role_id: &str, circle_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "role", role_id),
            role_id: role_id.to_string(),
            circle_id: circle_id.to_string(),
        }
    }
}
