//! Delete Role Use Case
//!
//! Hard delete of `custom` and `rep_link` roles. Domains (with their
//! policies), accountabilities and assignments go with the row.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::RoleDeleted;
use crate::role::RoleRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRoleCommand {
    pub role_id: String,
}

pub struct DeleteRoleUseCase<U: UnitOfWork> {
    role_repo: Arc<RoleRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> DeleteRoleUseCase<U> {
    pub fn new(role_repo: Arc<RoleRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            role_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: DeleteRoleCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<RoleDeleted> {
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

        if !role.role_type.is_elective() {
            return UseCaseResult::failure(UseCaseError::business_rule(
                "ROLE_NOT_DELETABLE",
                format!("Role '{}' of type '{}' cannot be deleted", role.id, role.role_type),
            ));
        }

        let event = RoleDeleted::new(&ctx, &role.id);
        self.unit_of_work.commit_remove(&role, event, &command).await
    }
}
