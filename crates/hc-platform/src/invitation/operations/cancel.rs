//! Cancel Invitation Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::InvitationCancelled;
use crate::invitation::{InvitationRepository, InvitationStatus};
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelInvitationCommand {
    pub invitation_id: String,
}

pub struct CancelInvitationUseCase<U: UnitOfWork> {
    invitation_repo: Arc<InvitationRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CancelInvitationUseCase<U> {
    pub fn new(invitation_repo: Arc<InvitationRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            invitation_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CancelInvitationCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<InvitationCancelled> {
        let mut invitation = match self.invitation_repo.find_by_id(&command.invitation_id).await {
            Ok(Some(i)) => i,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "INVITATION_NOT_FOUND",
                    format!("Invitation '{}' not found", command.invitation_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch invitation: {}",
                    e
                )));
            }
        };

        match invitation.status {
            InvitationStatus::Accepted => UseCaseResult::failure(UseCaseError::business_rule(
                "INVITATION_ALREADY_ACCEPTED",
                format!("Invitation '{}' was already accepted", invitation.id),
            )),
            InvitationStatus::Cancelled => {
                let event = InvitationCancelled::new(&ctx, &invitation.id, true);
                self.unit_of_work.commit_all(Vec::new(), event, &command).await
            }
            InvitationStatus::Pending => {
                invitation.transition(InvitationStatus::Cancelled);
                let event = InvitationCancelled::new(&ctx, &invitation.id, false);
                self.unit_of_work.commit(&invitation, event, &command).await
            }
        }
    }
}
