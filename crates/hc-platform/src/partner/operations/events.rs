//! Partner Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::partner::PartnerType;
use crate::usecase::{EventMetadata, ExecutionContext};

const SOURCE: &str = "holacracy:membership";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub partner_id: String,
    pub is_active: bool,
}

impl_domain_event!(PartnerUpdated);

impl PartnerUpdated {
    const EVENT_TYPE: &'static str = "holacracy:membership:partner:updated";

    pub fn new(ctx: &ExecutionContext, partner_id: &str, is_active: bool) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "partner", partner_id),
            partner_id: partner_id.to_string(),
            is_active,
        }
    }
}

/// Event emitted when a partner is promoted to admin or demoted to member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerTypeChanged {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub partner_id: String,
    pub partner_type: PartnerType,
}

impl_domain_event!(PartnerTypeChanged);

impl PartnerTypeChanged {
    const EVENT_TYPE: &'static str = "holacracy:membership:partner:type-changed";

    pub fn new(ctx: &ExecutionContext, partner_id: &str, partner_type: PartnerType) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "partner", partner_id),
            partner_id: partner_id.to_string(),
            partner_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDeleted {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub partner_id: String,
}

impl_domain_event!(PartnerDeleted);

impl PartnerDeleted {
    const EVENT_TYPE: &'static str = "holacracy:membership:partner:deleted";

    pub fn new(ctx: &ExecutionContext, partner_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "partner", partner_id),
            partner_id: partner_id.to_string(),
        }
    }
}
