//! Delete Organization Use Case
//!
//! Soft delete; every partner of the organization is soft-deleted in the
//! same transaction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::OrganizationDeleted;
use crate::organization::OrganizationRepository;
use crate::partner::PartnerCascade;
use crate::usecase::{Change, ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOrganizationCommand {
    pub organization_id: String,
}

pub struct DeleteOrganizationUseCase<U: UnitOfWork> {
    organization_repo: Arc<OrganizationRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> DeleteOrganizationUseCase<U> {
    pub fn new(organization_repo: Arc<OrganizationRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            organization_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: DeleteOrganizationCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<OrganizationDeleted> {
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

        organization.soft_delete();
        let event = OrganizationDeleted::new(&ctx, &organization.id);
        let cascade = PartnerCascade::Organization(organization.id.clone());

        self.unit_of_work
            .commit_all(
                vec![Change::save(organization), Change::save(cascade)],
                event,
                &command,
            )
            .await
    }
}
