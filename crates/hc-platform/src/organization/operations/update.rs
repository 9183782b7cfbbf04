//! Update Organization Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::OrganizationUpdated;
use crate::organization::OrganizationRepository;
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationCommand {
    pub organization_id: String,
    pub name: String,
}

pub struct UpdateOrganizationUseCase<U: UnitOfWork> {
    organization_repo: Arc<OrganizationRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdateOrganizationUseCase<U> {
    pub fn new(organization_repo: Arc<OrganizationRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            organization_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdateOrganizationCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<OrganizationUpdated> {
        let Some(name) = required_text(&command.name) else {
            return UseCaseResult::failure(UseCaseError::validation(
                "NAME_REQUIRED",
                "Organization name is required",
            ));
        };

        let mut organization = match self.organization_repo.find_active(&command.organization_id).await {
            Ok(Some(o)) => o,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "ORGANIZATION_NOT_FOUND",
                    format!("Organization '{}' not found", command.organization_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch organization: {}",
                    e
                )));
            }
        };

        organization.rename(name);
        let event = OrganizationUpdated::new(&ctx, &organization.id, &organization.name);
        self.unit_of_work.commit(&organization, event, &command).await
    }
}
