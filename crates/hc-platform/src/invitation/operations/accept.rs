//! Accept Invitation Use Case
//!
//! Looks the invitation up by code. A pending invitation produces a member
//! partner (or revives a soft-deleted one) and flips to accepted in one
//! transaction. Accepting again as the partner it produced is a no-op
//! success; never a second partner.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::events::InvitationAccepted;
use crate::invitation::{InvitationRepository, InvitationStatus};
use crate::organization::OrganizationRepository;
use crate::partner::{Partner, PartnerRepository, PartnerRevival, PartnerType};
use crate::user::UserRepository;
use crate::usecase::{Change, ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitationCommand {
    pub code: String,
    pub user_id: String,
}

pub struct AcceptInvitationUseCase<U: UnitOfWork> {
    invitation_repo: Arc<InvitationRepository>,
    organization_repo: Arc<OrganizationRepository>,
    user_repo: Arc<UserRepository>,
    partner_repo: Arc<PartnerRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> AcceptInvitationUseCase<U> {
    pub fn new(
        invitation_repo: Arc<InvitationRepository>,
        organization_repo: Arc<OrganizationRepository>,
        user_repo: Arc<UserRepository>,
        partner_repo: Arc<PartnerRepository>,
        unit_of_work: Arc<U>,
    ) -> Self {
        Self {
            invitation_repo,
            organization_repo,
            user_repo,
            partner_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: AcceptInvitationCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<InvitationAccepted> {
        let mut invitation = match self.invitation_repo.find_by_code(&command.code).await {
            Ok(Some(i)) => i,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "INVITATION_NOT_FOUND",
                    format!("Invitation with code '{}' not found", command.code),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch invitation: {}",
                    e
                )));
            }
        };

        let user = match self.user_repo.find_by_id(&command.user_id).await {
            Ok(Some(u)) if u.is_active() => u,
            Ok(_) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "USER_NOT_FOUND",
                    format!("User '{}' not found", command.user_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch user: {}",
                    e
                )));
            }
        };

        let existing = match self
            .partner_repo
            .find_by_user_and_organization(&user.id, &invitation.organization_id)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch partner: {}",
                    e
                )));
            }
        };

        match invitation.status {
            InvitationStatus::Cancelled => {
                return UseCaseResult::failure(UseCaseError::business_rule(
                    "INVITATION_CANCELLED",
                    format!("Invitation '{}' was cancelled", invitation.id),
                ));
            }
            InvitationStatus::Accepted => {
                return match existing {
                    Some(partner)
                        if !partner.is_deleted
                            && partner.invitation_id.as_deref() == Some(invitation.id.as_str()) =>
                    {
                        debug!(invitation_id = %invitation.id, "Invitation already accepted by caller");
                        let event = InvitationAccepted::new(
                            &ctx,
                            &invitation.id,
                            &invitation.organization_id,
                            &partner.id,
                            &user.id,
                            true,
                        );
                        self.unit_of_work.commit_all(Vec::new(), event, &command).await
                    }
                    _ => UseCaseResult::failure(UseCaseError::business_rule(
                        "INVITATION_ALREADY_ACCEPTED",
                        format!("Invitation '{}' was already accepted", invitation.id),
                    )),
                };
            }
            InvitationStatus::Pending => {}
        }

        match self.organization_repo.find_active(&invitation.organization_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "ORGANIZATION_NOT_FOUND",
                    format!("Organization '{}' not found", invitation.organization_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch organization: {}",
                    e
                )));
            }
        }

        let (partner_id, partner_change) = match existing {
            Some(partner) if !partner.is_deleted => {
                return UseCaseResult::failure(UseCaseError::already_exists(
                    "PARTNER_EXISTS",
                    format!(
                        "User '{}' is already a partner of organization '{}'",
                        user.id, invitation.organization_id
                    ),
                ));
            }
            Some(mut partner) => {
                debug!(partner_id = %partner.id, "Reviving soft-deleted partner");
                partner.revive(&user, &invitation.id);
                (partner.id.clone(), Change::save(PartnerRevival(partner)))
            }
            None => {
                let partner = Partner::for_user(&user, &invitation.organization_id, PartnerType::Member)
                    .with_invitation(&invitation.id);
                (partner.id.clone(), Change::save(partner))
            }
        };

        invitation.transition(InvitationStatus::Accepted);

        let event = InvitationAccepted::new(
            &ctx,
            &invitation.id,
            &invitation.organization_id,
            &partner_id,
            &user.id,
            false,
        );

        // The status flip goes first: it only matches a still-pending row
        self.unit_of_work
            .commit_all(vec![Change::save(invitation), partner_change], event, &command)
            .await
    }
}
