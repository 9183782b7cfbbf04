//! Accountability Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::usecase::{EventMetadata, ExecutionContext};

const SOURCE: &str = "holacracy:governance";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountabilityCreated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub accountability_id: String,
    pub role_id: String,
    pub title: String,
}

impl_domain_event!(AccountabilityCreated);

impl AccountabilityCreated {
    const EVENT_TYPE: &'static str = "holacracy:governance:accountability:created";

    pub fn new(ctx: &ExecutionContext, accountability_id: &str, role_id: &str, title: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SOURCE,
                "accountability",
                accountability_id,
            ),
            accountability_id: accountability_id.to_string(),
            role_id: role_id.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountabilityUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub accountability_id: String,
    pub title: String,
}

impl_domain_event!(AccountabilityUpdated);

impl AccountabilityUpdated {
    const EVENT_TYPE: &'static str = "holacracy:governance:accountability:updated";

    pub fn new(ctx: &ExecutionContext, accountability_id: &str, title: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SOURCE,
                "accountability",
                accountability_id,
            ),
            accountability_id: accountability_id.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountabilityDeleted {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub accountability_id: String,
}

impl_domain_event!(AccountabilityDeleted);

impl AccountabilityDeleted {
    const EVENT_TYPE: &'static str = "holacracy:governance:accountability:deleted";

    pub fn new(ctx: &ExecutionContext, accountability_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SOURCE,
                "accountability",
                accountability_id,
            ),
            accountability_id: accountability_id.to_string(),
        }
    }
}
