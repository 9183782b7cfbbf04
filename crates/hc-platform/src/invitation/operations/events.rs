//! Invitation Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::usecase::{EventMetadata, ExecutionContext};

const SOURCE: &str = "holacracy:membership";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationCreated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub invitation_id: String,
    pub organization_id: String,
    pub email: String,
}

impl_domain_event!(InvitationCreated);

impl InvitationCreated {
    const EVENT_TYPE: &'static str = "holacracy:membership:invitation:created";

    pub fn new(ctx: &ExecutionContext, invitation_id: &str, organization_id: &str, email: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "invitation", invitation_id),
            invitation_id: invitation_id.to_string(),
            organization_id: organization_id.to_string(),
            email: email.to_string(),
        }
    }
}

/// Event emitted when an invitation is accepted.
///
/// `repeated` marks a second accept by the partner the invitation already
/// produced; nothing else changed in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationAccepted {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub invitation_id: String,
    pub organization_id: String,
    pub partner_id: String,
    pub user_id: String,
    pub repeated: bool,
}

impl_domain_event!(InvitationAccepted);

impl InvitationAccepted {
    const EVENT_TYPE: &'static str = "holacracy:membership:invitation:accepted";

    pub fn new(
        ctx: &ExecutionContext,
        invitation_id: &str,
        organization_id: &str,
        partner_id: &str,
        user_id: &str,
        repeated: bool,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "invitation", invitation_id),
            invitation_id: invitation_id.to_string(),
            organization_id: organization_id.to_string(),
            partner_id: partner_id.to_string(),
            user_id: user_id.to_string(),
            repeated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationCancelled {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub invitation_id: String,
    pub repeated: bool,
}

impl_domain_event!(InvitationCancelled);

impl InvitationCancelled {
    const EVENT_TYPE: &'static str = "holacracy:membership:invitation:cancelled";

    pub fn new(ctx: &ExecutionContext, invitation_id: &str, repeated: bool) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "invitation", invitation_id),
            invitation_id: invitation_id.to_string(),
            repeated,
        }
    }
}
