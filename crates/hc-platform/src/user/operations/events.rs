//! User Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::usecase::{EventMetadata, ExecutionContext};

const SOURCE: &str = "holacracy:identity";

/// Event emitted when a caller registers for the first time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistered {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub user_id: String,
    pub external_id: String,
    pub email: String,
}

impl_domain_event!(UserRegistered);

impl UserRegistered {
    const EVENT_TYPE: &'static str = "holacracy:identity:user:registered";

    pub fn new(ctx: &ExecutionContext, user_id: &str, external_id: &str, email: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "user", user_id),
            user_id: user_id.to_string(),
            external_id: external_id.to_string(),
            email: email.to_string(),
        }
    }
}

/// Event emitted when a soft-deleted user registers again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReactivated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub user_id: String,
}

impl_domain_event!(UserReactivated);

impl UserReactivated {
    const EVENT_TYPE: &'static str = "holacracy:identity:user:reactivated";

    pub fn new(ctx: &ExecutionContext, user_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "user", user_id),
            user_id: user_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl_domain_event!(UserUpdated);

impl UserUpdated {
    const EVENT_TYPE: &'static str = "holacracy:identity:user:updated";

    pub fn new(
        ctx: &ExecutionContext,
        user_id: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "user", user_id),
            user_id: user_id.to_string(),
            first_name: first_name.map(String::from),
            last_name: last_name.map(String::from),
        }
    }
}

/// Event emitted when a user is soft-deleted along with its partners.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDeleted {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub user_id: String,
}

impl_domain_event!(UserDeleted);

impl UserDeleted {
    const EVENT_TYPE: &'static str = "holacracy:identity:user:deleted";

    pub fn new(ctx: &ExecutionContext, user_id: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "user", user_id),
            user_id: user_id.to_string(),
        }
    }
}
