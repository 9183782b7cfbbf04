//! Organization Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::usecase::{EventMetadata, ExecutionContext};

const SOURCE: &str = "holacracy:governance";

/// Event emitted when an organization is bootstrapped.
///
/// Carries the ids of everything created in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationCreated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub organization_id: String,
    pub name: String,
    pub anchor_circle_id: String,
    pub admin_partner_id: String,
    pub role_ids: Vec<String>,
}

impl_domain_event!(OrganizationCreated);

impl OrganizationCreated {
    const EVENT_TYPE: &'static str = "holacracy:governance:organization:created";

    pub fn new(
        ctx: &ExecutionContext,
        organization_id: &str,
        name: &str,
        anchor_circle_id: &str,
        admin_partner_id: &str,
        role_ids: Vec<String>,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SOURCE,
                "organization",
                organization_id,
            ),
            organization_id: organization_id.to_string(),
            name: name.to_string(),
            anchor_circle_id: anchor_circle_id.to_string(),
            admin_partner_id: admin_partner_id.to_string(),
            role_ids,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub organization_id: String,
    pub name: String,
}

impl_domain_event!(OrganizationUpdated);

impl OrganizationUpdated {
    const EVENT_TYPE: &'static str = "holacracy:governance:organization:updated";

    pub fn new(ctx: &ExecutionContext, organization_id: &str, name: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SOURCE,
                "organization",
                organization_id,
            ),
            organization_id: organization_id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Event emitted when an organization and all of its partners are
/// soft-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDeleted {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub organization_id: String,
}

impl_domain_event!(OrganizationDeleted);

impl OrganizationDeleted {
    const EVENT_TYPE: &'static str = "holacracy:governance:organization:deleted";

    pub fn new(ctx: &ExecutionContext, organization_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SOURCE,
                "organization",
                organization_id,
            ),
            organization_id: organization_id.to_string(),
        }
    }
}
