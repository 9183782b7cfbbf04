//! Circle Membership Use Cases
//!
//! Adding is idempotent on the (circle, partner) pair. Removing a partner
//! that is not a member fails on the association itself.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::{CircleMemberAdded, CircleMemberRemoved};
use crate::circle::{Circle, CircleMembership, CircleRepository};
use crate::details;
use crate::partner::{Partner, PartnerRepository};
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCircleMemberCommand {
    pub circle_id: String,
    pub partner_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCircleMemberCommand {
    pub circle_id: String,
    pub partner_id: String,
}

/// Load the live circle and partner, both in the same organization.
async fn load_endpoints(
    circle_repo: &CircleRepository,
    partner_repo: &PartnerRepository,
    circle_id: &str,
    partner_id: &str,
) -> Result<(Circle, Partner), UseCaseError> {
    let circle = circle_repo
        .find_active(circle_id)
        .await
        .map_err(|e| UseCaseError::commit(format!("Failed to fetch circle: {}", e)))?
        .ok_or_else(|| {
            UseCaseError::not_found("CIRCLE_NOT_FOUND", format!("Circle '{}' not found", circle_id))
        })?;

    let partner = partner_repo
        .find_active(partner_id)
        .await
        .map_err(|e| UseCaseError::commit(format!("Failed to fetch partner: {}", e)))?
        .ok_or_else(|| {
            UseCaseError::not_found("PARTNER_NOT_FOUND", format!("Partner '{}' not found", partner_id))
        })?;

    if circle.organization_id != partner.organization_id {
        return Err(UseCaseError::business_rule_with_details(
            "ORGANIZATION_MISMATCH",
            format!("Partner '{}' does not belong to the organization of circle '{}'", partner_id, circle_id),
            details! {
                "circleOrganizationId" => circle.organization_id,
                "partnerOrganizationId" => partner.organization_id,
            },
        ));
    }

    Ok((circle, partner))
}

pub struct AddCircleMemberUseCase<U: UnitOfWork> {
    circle_repo: Arc<CircleRepository>,
    partner_repo: Arc<PartnerRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> AddCircleMemberUseCase<U> {
    pub fn new(
        circle_repo: Arc<CircleRepository>,
        partner_repo: Arc<PartnerRepository>,
        unit_of_work: Arc<U>,
    ) -> Self {
        Self {
            circle_repo,
            partner_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: AddCircleMemberCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<CircleMemberAdded> {
        let (circle, partner) = match load_endpoints(
            &self.circle_repo,
            &self.partner_repo,
            &command.circle_id,
            &command.partner_id,
        )
        .await
        {
            Ok(endpoints) => endpoints,
            Err(e) => return UseCaseResult::failure(e),
        };

        let membership = CircleMembership::new(&circle.id, &partner.id);
        let event = CircleMemberAdded::new(&ctx, &circle.id, &partner.id);
        self.unit_of_work.commit(&membership, event, &command).await
    }
}

pub struct RemoveCircleMemberUseCase<U: UnitOfWork> {
    circle_repo: Arc<CircleRepository>,
    partner_repo: Arc<PartnerRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> RemoveCircleMemberUseCase<U> {
    pub fn new(
        circle_repo: Arc<CircleRepository>,
        partner_repo: Arc<PartnerRepository>,
        unit_of_work: Arc<U>,
    ) -> Self {
        Self {
            circle_repo,
            partner_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: RemoveCircleMemberCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<CircleMemberRemoved> {
        let (circle, partner) = match load_endpoints(
            &self.circle_repo,
            &self.partner_repo,
            &command.circle_id,
            &command.partner_id,
        )
        .await
        {
            Ok(endpoints) => endpoints,
            Err(e) => return UseCaseResult::failure(e),
        };

        match self.circle_repo.is_member(&circle.id, &partner.id).await {
            Ok(true) => {}
            Ok(false) => {
                return UseCaseResult::failure(UseCaseError::not_found_with_details(
                    "MEMBERSHIP_NOT_FOUND",
                    format!("Partner '{}' is not a member of circle '{}'", partner.id, circle.id),
                    details! { "circleId" => circle.id, "partnerId" => partner.id },
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch membership: {}",
                    e
                )));
            }
        }

        let membership = CircleMembership::new(&circle.id, &partner.id);
        let event = CircleMemberRemoved::new(&ctx, &circle.id, &partner.id);
        self.unit_of_work.commit_remove(&membership, event, &command).await
    }
}
