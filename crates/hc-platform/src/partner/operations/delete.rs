//! Delete Partner Use Case
//!
//! Soft delete of this partner only; memberships and assignments stay and
//! are hidden by the listing filters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::PartnerDeleted;
use crate::partner::PartnerRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePartnerCommand {
    pub partner_id: String,
}

pub struct DeletePartnerUseCase<U: UnitOfWork> {
    partner_repo: Arc<PartnerRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> DeletePartnerUseCase<U> {
    pub fn new(partner_repo: Arc<PartnerRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            partner_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: DeletePartnerCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PartnerDeleted> {
        let mut partner = match self.partner_repo.find_active(&command.partner_id).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "PARTNER_NOT_FOUND",
                    format!("Partner '{}' not found", command.partner_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch partner: {}",
                    e
                )));
            }
        };

        partner.soft_delete();
        let event = PartnerDeleted::new(&ctx, &partner.id);
        self.unit_of_work.commit(&partner, event, &command).await
    }
}
