//! Update Role Use Case

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::events::RoleUpdated;
use crate::role::RoleRepository;
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleCommand {
    pub role_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

pub struct UpdateRoleUseCase<U: UnitOfWork> {
    role_repo: Arc<RoleRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdateRoleUseCase<U> {
    pub fn new(role_repo: Arc<RoleRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            role_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdateRoleCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<RoleUpdated> {
        let mut role = match self.role_repo.find_by_id(&command.role_id).await {
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

        if let Some(ref name) = command.name {
            let Some(name) = required_text(name) else {
                return UseCaseResult::failure(UseCaseError::validation(
                    "NAME_REQUIRED",
                    "Role name cannot be blank",
                ));
            };
            role.name = name;
        }
        if let Some(ref purpose) = command.purpose {
            role.purpose = required_text(purpose);
        }
        role.updated_at = Utc::now();

        let event = RoleUpdated::new(&ctx, &role.id, &role.name, role.purpose.as_deref());
        self.unit_of_work.commit(&role, event, &command).await
    }
}
