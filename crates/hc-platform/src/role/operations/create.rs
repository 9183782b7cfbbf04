//! Create Role Use Case
//!
//! Only `custom` and `rep_link` roles are created here; the core roles come
//! with the circle and `circle` roles come from expansion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::RoleCreated;
use crate::circle::CircleRepository;
use crate::role::{Role, RoleType};
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleCommand {
    pub circle_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_type: Option<RoleType>,
}

pub struct CreateRoleUseCase<U: UnitOfWork> {
    circle_repo: Arc<CircleRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreateRoleUseCase<U> {
    pub fn new(circle_repo: Arc<CircleRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            circle_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreateRoleCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<RoleCreated> {
        let Some(name) = required_text(&command.name) else {
            return UseCaseResult::failure(UseCaseError::validation(
                "NAME_REQUIRED",
                "Role name is required",
            ));
        };

        let role_type = command.role_type.unwrap_or_default();
        if !role_type.is_elective() {
            return UseCaseResult::failure(UseCaseError::validation(
                "ROLE_TYPE_NOT_ALLOWED",
                format!("Roles of type '{}' cannot be created directly", role_type),
            ));
        }

        let circle = match self.circle_repo.find_active(&command.circle_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "CIRCLE_NOT_FOUND",
                    format!("Circle '{}' not found", command.circle_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch circle: {}",
                    e
                )));
            }
        };

        let purpose = command
            .purpose
            .as_deref()
            .and_then(required_text)
            .or_else(|| role_type.default_purpose().map(String::from));
        let role = Role::new(&circle.id, &name, purpose, role_type);
        let event = RoleCreated::new(&ctx, &role.id, &circle.id, &role.name, role.role_type);

        self.unit_of_work.commit(&role, event, &command).await
    }
}
