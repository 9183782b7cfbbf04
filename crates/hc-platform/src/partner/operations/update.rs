//! Update Partner Use Case

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::events::PartnerUpdated;
use crate::invitation::operations::is_valid_email;
use crate::partner::PartnerRepository;
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartnerCommand {
    pub partner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

pub struct UpdatePartnerUseCase<U: UnitOfWork> {
    partner_repo: Arc<PartnerRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdatePartnerUseCase<U> {
    pub fn new(partner_repo: Arc<PartnerRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            partner_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdatePartnerCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PartnerUpdated> {
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

        if let Some(ref email) = command.email {
            let email = email.trim();
            if !is_valid_email(email) {
                return UseCaseResult::failure(UseCaseError::validation(
                    "INVALID_EMAIL",
                    format!("'{}' is not a valid email address", email),
                ));
            }
            partner.email = email.to_lowercase();
        }
        if let Some(first_name) = command.first_name.as_deref().and_then(required_text) {
            partner.first_name = Some(first_name);
        }
        if let Some(last_name) = command.last_name.as_deref().and_then(required_text) {
            partner.last_name = Some(last_name);
        }
        if let Some(is_active) = command.is_active {
            partner.is_active = is_active;
        }
        partner.updated_at = Utc::now();

        let event = PartnerUpdated::new(&ctx, &partner.id, partner.is_active);
        self.unit_of_work.commit(&partner, event, &command).await
    }
}
