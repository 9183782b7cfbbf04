//! Create Domain Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::DomainCreated;
use crate::domain::Domain;
use crate::role::RoleRepository;
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDomainCommand {
    pub role_id: String,
    pub title: String,
}

pub struct CreateDomainUseCase<U: UnitOfWork> {
    role_repo: Arc<RoleRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreateDomainUseCase<U> {
    pub fn new(role_repo: Arc<RoleRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            role_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreateDomainCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<DomainCreated> {
        let Some(title) = required_text(&command.title) else {
            return UseCaseResult::failure(UseCaseError::validation(
                "TITLE_REQUIRED",
                "Domain title is required",
            ));
        };

        let role = match self.role_repo.find_by_id(&command.role_id).await {
            Ok(Some(r)) => r,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "ROLE_NOT_FOUND",
                    format!("Role '{}' not found", command.role_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch role: {}",
                    e
                )));
            }
        };

        let domain = Domain::new(&role.id, &title);
        let event = DomainCreated::new(&ctx, &domain.id, &role.id, &domain.title);
        self.unit_of_work.commit(&domain, event, &command).await
    }
}
