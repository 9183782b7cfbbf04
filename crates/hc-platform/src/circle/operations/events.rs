//! Circle Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::usecase::{EventMetadata, ExecutionContext};

const SOURCE: &str = "holacracy:governance";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleCreated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub circle_id: String,
    pub organization_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_circle_id: Option<String>,
    pub name: String,
}

impl_domain_event!(CircleCreated);

impl CircleCreated {
    const EVENT_TYPE: &'static str = "holacracy:governance:circle:created";

    pub fn new(
        ctx: &ExecutionContext,
        circle_id: &str,
        organization_id: &str,
        parent_circle_id: Option<&str>,
        name: &str,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "circle", circle_id),
            circle_id: circle_id.to_string(),
            organization_id: organization_id.to_string(),
            parent_circle_id: parent_circle_id.map(String::from),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub circle_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl_domain_event!(CircleUpdated);

impl CircleUpdated {
    const EVENT_TYPE: &'static str = "holacracy:governance:circle:updated";

    pub fn new(ctx: &ExecutionContext, circle_id: &str, name: &str, purpose: Option<&str>) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "circle", circle_id),
            circle_id: circle_id.to_string(),
            name: name.to_string(),
            purpose: purpose.map(String::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleDeleted {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub circle_id: String,
}

impl_domain_event!(CircleDeleted);

impl CircleDeleted {
    const EVENT_TYPE: &'static str = "holacracy:governance:circle:deleted";

    pub fn new(ctx: &ExecutionContext, circle_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "circle", circle_id),
            circle_id: circle_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMemberAdded {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub circle_id: String,
    pub partner_id: String,
}

impl_domain_event!(CircleMemberAdded);

impl CircleMemberAdded {
    const EVENT_TYPE: &'static str = "holacracy:governance:circle:member-added";

    pub fn new(ctx: &ExecutionContext, circle_id: &str, partner_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "circle", circle_id),
            circle_id: circle_id.to_string(),
            partner_id: partner_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMemberRemoved {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub circle_id: String,
    pub partner_id: String,
}

impl_domain_event!(CircleMemberRemoved);

impl CircleMemberRemoved {
    const EVENT_TYPE: &'static str = "holacracy:governance:circle:member-removed";

    pub fn new(ctx: &ExecutionContext, circle_id: &str, partner_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "circle", circle_id),
            circle_id: circle_id.to_string(),
            partner_id: partner_id.to_string(),
        }
    }
}
