//! Role Assignment Use Cases
//!
//! Same semantics as circle membership, against the role/partner pair.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::{RoleMemberAdded, RoleMemberRemoved};
use crate::circle::CircleRepository;
use crate::details;
use crate::partner::{Partner, PartnerRepository};
use crate::role::{Role, RoleAssignment, RoleRepository};
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRoleMemberCommand {
    pub role_id: String,
    pub partner_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRoleMemberCommand {
    pub role_id: String,
    pub partner_id: String,
}

/// Repositories an assignment touches
#[derive(Clone)]
pub struct AssignmentRepos {
    pub role_repo: Arc<RoleRepository>,
    pub circle_repo: Arc<CircleRepository>,
    pub partner_repo: Arc<PartnerRepository>,
}

impl AssignmentRepos {
    /// The role (in a live circle) and the live partner, same organization.
    async fn load(&self, role_id: &str, partner_id: &str) -> Result<(Role, Partner), UseCaseError> {
        let role = self
            .role_repo
            .find_by_id(role_id)
            .await
            .map_err(|e| UseCaseError::commit(format!("Failed to fetch role: {}", e)))?
            .ok_or_else(|| UseCaseError::not_found("ROLE_NOT_FOUND", format!("Role '{}' not found", role_id)))?;

        let circle_id = role.parent_circle_id.clone().unwrap_or_default();
        let circle = self
            .circle_repo
            .find_active(&circle_id)
            .await
            .map_err(|e| UseCaseError::commit(format!("Failed to fetch circle: {}", e)))?
            .ok_or_else(|| {
                UseCaseError::not_found("CIRCLE_NOT_FOUND", format!("Circle of role '{}' not found", role_id))
            })?;

        let partner = self
            .partner_repo
            .find_active(partner_id)
            .await
            .map_err(|e| UseCaseError::commit(format!("Failed to fetch partner: {}", e)))?
            .ok_or_else(|| {
                UseCaseError::not_found("PARTNER_NOT_FOUND", format!("Partner '{}' not found", partner_id))
            })?;

        if circle.organization_id != partner.organization_id {
            return Err(UseCaseError::business_rule_with_details(
                "ORGANIZATION_MISMATCH",
                format!("Partner '{}' does not belong to the organization of role '{}'", partner_id, role_id),
                details! {
                    "roleOrganizationId" => circle.organization_id,
                    "partnerOrganizationId" => partner.organization_id,
                },
            ));
        }

        Ok((role, partner))
    }
}

pub struct AddRoleMemberUseCase<U: UnitOfWork> {
    repos: AssignmentRepos,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> AddRoleMemberUseCase<U> {
    pub fn new(repos: AssignmentRepos, unit_of_work: Arc<U>) -> Self {
        Self { repos, unit_of_work }
    }

    pub async fn execute(
        &self,
        command: AddRoleMemberCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<RoleMemberAdded> {
        let (role, partner) = match self.repos.load(&command.role_id, &command.partner_id).await {
            Ok(endpoints) => endpoints,
            Err(e) => return UseCaseResult::failure(e),
        };

        let assignment = RoleAssignment::new(&role.id, &partner.id);
        let event = RoleMemberAdded::new(&ctx, &role.id, &partner.id);
        self.unit_of_work.commit(&assignment, event, &command).await
    }
}

pub struct RemoveRoleMemberUseCase<U: UnitOfWork> {
    repos: AssignmentRepos,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> RemoveRoleMemberUseCase<U> {
    pub fn new(repos: AssignmentRepos, unit_of_work: Arc<U>) -> Self {
        Self { repos, unit_of_work }
    }

    pub async fn execute(
        &self,
        command: RemoveRoleMemberCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<RoleMemberRemoved> {
        let (role, partner) = match self.repos.load(&command.role_id, &command.partner_id).await {
            Ok(endpoints) => endpoints,
            Err(e) => return UseCaseResult::failure(e),
        };

        match self.repos.role_repo.is_assigned(&role.id, &partner.id).await {
            Ok(true) => {}
            Ok(false) => {
                return UseCaseResult::failure(UseCaseError::not_found_with_details(
                    "ASSIGNMENT_NOT_FOUND",
                    format!("Partner '{}' is not assigned to role '{}'", partner.id, role.id),
                    details! { "roleId" => role.id, "partnerId" => partner.id },
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch assignment: {}",
                    e
                )));
            }
        }

        let assignment = RoleAssignment::new(&role.id, &partner.id);
        let event = RoleMemberRemoved::new(&ctx, &role.id, &partner.id);
        self.unit_of_work.commit_remove(&assignment, event, &command).await
    }
}
