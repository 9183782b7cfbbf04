//! Expand Role Use Case
//!
//! Turns a role into a sub-circle of the circle it lives in. The reverse
//! direction is not supported.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::RoleExpanded;
use crate::circle::{Circle, CircleRepository};
use crate::role::{RoleRepository, RoleType};
use crate::usecase::{Change, ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandRoleCommand {
    pub role_id: String,
}

pub struct ExpandRoleUseCase<U: UnitOfWork> {
    role_repo: Arc<RoleRepository>,
    circle_repo: Arc<CircleRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> ExpandRoleUseCase<U> {
    pub fn new(
        role_repo: Arc<RoleRepository>,
        circle_repo: Arc<CircleRepository>,
        unit_of_work: Arc<U>,
    ) -> Self {
        Self {
            role_repo,
            circle_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: ExpandRoleCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<RoleExpanded> {
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

        if role.role_type == RoleType::Circle {
            return UseCaseResult::failure(UseCaseError::business_rule(
                "ROLE_ALREADY_CIRCLE",
                format!("Role '{}' already represents a circle", role.id),
            ));
        }
        if !role.role_type.is_elective() {
            return UseCaseResult::failure(UseCaseError::business_rule(
                "ROLE_NOT_EXPANDABLE",
                format!("Role '{}' of type '{}' cannot become a circle", role.id, role.role_type),
            ));
        }

        let Some(parent_id) = role.parent_circle_id.clone() else {
            return UseCaseResult::failure(UseCaseError::not_found(
                "CIRCLE_NOT_FOUND",
                format!("Role '{}' has no parent circle", role.id),
            ));
        };
        let parent = match self.circle_repo.find_active(&parent_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "CIRCLE_NOT_FOUND",
                    format!("Circle of role '{}' not found", role.id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch circle: {}",
                    e
                )));
            }
        };

        let circle = Circle::child_of(&parent, &role.name, role.purpose.clone());
        role.expand_into(&circle.id);
        let event = RoleExpanded::new(&ctx, &role.id, &circle.id);

        self.unit_of_work
            .commit_all(vec![Change::save(circle), Change::save(role)], event, &command)
            .await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapseRoleCommand {
    pub role_id: String,
}

#[derive(Debug, Default)]
pub struct CollapseRoleUseCase;

impl CollapseRoleUseCase {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(
        &self,
        command: CollapseRoleCommand,
        _ctx: ExecutionContext,
    ) -> UseCaseResult<()> {
        UseCaseResult::failure(UseCaseError::not_implemented(
            "COLLAPSE_NOT_IMPLEMENTED",
            format!("Collapsing the circle of role '{}'", command.role_id),
        ))
    }
}
