//! Domain Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::usecase::{EventMetadata, ExecutionContext};

const SOURCE: &str = "holacracy:governance";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCreated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub domain_id: String,
    pub role_id: String,
    pub title: String,
}

impl_domain_event!(DomainCreated);

impl DomainCreated {
    const EVENT_TYPE: &'static str = "holacracy:governance:domain:created";

    pub fn new(ctx: &ExecutionContext, domain_id: &str, role_id: &str, title: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "domain", domain_id),
            domain_id: domain_id.to_string(),
            role_id: role_id.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub domain_id: String,
    pub title: String,
}

impl_domain_event!(DomainUpdated);

impl DomainUpdated {
    const EVENT_TYPE: &'static str = "holacracy:governance:domain:updated";

    pub fn new(ctx: &ExecutionContext, domain_id: &str, title: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "domain", domain_id),
            domain_id: domain_id.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDeleted {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub domain_id: String,
    pub role_id: String,
}

impl_domain_event!(DomainDeleted);

impl DomainDeleted {
    const EVENT_TYPE: &'static str = "holacracy:governance:domain:deleted";

    pub fn new(ctx: &ExecutionContext, domain_id: &str, role_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "domain", domain_id),
            domain_id: domain_id.to_string(),
            role_id: role_id.to_string(),
        }
    }
}
