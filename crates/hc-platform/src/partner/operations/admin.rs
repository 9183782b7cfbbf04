//! Promote / Demote Partner Use Case
//!
//! Sets the partner's type tag. Setting the current value again succeeds.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::PartnerTypeChanged;
use crate::partner::{PartnerRepository, PartnerType};
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPartnerTypeCommand {
    pub partner_id: String,
    pub partner_type: PartnerType,
}

pub struct SetPartnerTypeUseCase<U: UnitOfWork> {
    partner_repo: Arc<PartnerRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> SetPartnerTypeUseCase<U> {
    pub fn new(partner_repo: Arc<PartnerRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            partner_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: SetPartnerTypeCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PartnerTypeChanged> {
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

        partner.set_type(command.partner_type);
        let event = PartnerTypeChanged::new(&ctx, &partner.id, partner.partner_type);
        self.unit_of_work.commit(&partner, event, &command).await
    }
}
