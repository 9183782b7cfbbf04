//! Create Accountability Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::AccountabilityCreated;
use crate::accountability::Accountability;
use crate::role::RoleRepository;
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountabilityCommand {
    pub role_id: String,
    pub title: String,
}

pub struct CreateAccountabilityUseCase<U: UnitOfWork> {
    role_repo: Arc<RoleRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreateAccountabilityUseCase<U> {
    pub fn new(role_repo: Arc<RoleRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            role_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreateAccountabilityCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<AccountabilityCreated> {
        let Some(title) = required_text(&command.title) else {
            return UseCaseResult::failure(UseCaseError::validation(
                "TITLE_REQUIRED",
                "Accountability title is required",
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

        let accountability = Accountability::new(&role.id, &title);
        let event = AccountabilityCreated::new(&ctx, &accountability.id, &role.id, &accountability.title);
        self.unit_of_work.commit(&accountability, event, &command).await
    }
}
