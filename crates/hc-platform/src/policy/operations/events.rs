//! Policy Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::usecase::{EventMetadata, ExecutionContext};

const SOURCE: &str = "holacracy:governance";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyCreated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub policy_id: String,
    pub domain_id: String,
    pub title: String,
}

impl_domain_event!(PolicyCreated);

impl PolicyCreated {
    const EVENT_TYPE: &'static str = "holacracy:governance:policy:created";

    pub fn new(ctx: &ExecutionContext, policy_id: &str, domain_id: &str, title: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "policy", policy_id),
            policy_id: policy_id.to_string(),
            domain_id: domain_id.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub policy_id: String,
    pub title: String,
}

impl_domain_event!(PolicyUpdated);

impl PolicyUpdated {
    const EVENT_TYPE: &'static str = "holacracy:governance:policy:updated";

    pub fn new(ctx: &ExecutionContext, policy_id: &str, title: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "policy", policy_id),
            policy_id: policy_id.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDeleted {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub policy_id: String,
}

impl_domain_event!(PolicyDeleted);

impl PolicyDeleted {
    const EVENT_TYPE: &'static str = "holacracy:governance:policy:deleted";

    pub fn new(ctx: &ExecutionContext, policy_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "policy", policy_id),
            policy_id: policy_id.to_string(),
        }
    }
}
