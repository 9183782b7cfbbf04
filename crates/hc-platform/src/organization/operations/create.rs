//! Create Organization Use Case
//!
//! Bootstraps an organization in one transaction: the organization, its
//! anchor circle, the core roles, the creator's admin partner, the anchor
//! membership and the lead link assignment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::events::OrganizationCreated;
use crate::circle::{Circle, CircleMembership};
use crate::organization::Organization;
use crate::partner::{Partner, PartnerType};
use crate::role::{Role, RoleAssignment, RoleType};
use crate::shared::api_common::required_text;
use crate::user::UserRepository;
use crate::usecase::{Change, ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationCommand {
    /// Creating user; becomes the first admin
    pub user_id: String,
    pub name: String,
}

pub struct CreateOrganizationUseCase<U: UnitOfWork> {
    user_repo: Arc<UserRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreateOrganizationUseCase<U> {
    pub fn new(user_repo: Arc<UserRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            user_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreateOrganizationCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<OrganizationCreated> {
        let Some(name) = required_text(&command.name) else {
            return UseCaseResult::failure(UseCaseError::validation(
                "NAME_REQUIRED",
                "Organization name is required",
            ));
        };

        let user = match self.user_repo.find_by_id(&command.user_id).await {
            Ok(Some(u)) if u.is_active() => u,
            Ok(_) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "USER_NOT_FOUND",
                    format!("User '{}' not found", command.user_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch user: {}",
                    e
                )));
            }
        };

        let organization = Organization::new(&name);
        let anchor = Circle::anchor(&organization.id, &name);
        let admin = Partner::for_user(&user, &organization.id, PartnerType::Admin);
        let roles: Vec<Role> = RoleType::CORE
            .iter()
            .map(|role_type| Role::core(&anchor.id, *role_type))
            .collect();

        let lead_link = roles
            .iter()
            .find(|r| r.role_type == RoleType::LeadLink)
            .map(|r| RoleAssignment::new(&r.id, &admin.id));

        let event = OrganizationCreated::new(
            &ctx,
            &organization.id,
            &organization.name,
            &anchor.id,
            &admin.id,
            roles.iter().map(|r| r.id.clone()).collect(),
        );

        debug!(
            organization_id = %organization.id,
            anchor_circle_id = %anchor.id,
            "Bootstrapping organization"
        );

        let membership = CircleMembership::new(&anchor.id, &admin.id);
        let mut changes = vec![
            Change::save(organization),
            Change::save(anchor),
            Change::save(admin),
        ];
        changes.extend(roles.into_iter().map(Change::save));
        changes.push(Change::save(membership));
        changes.extend(lead_link.map(Change::save));

        self.unit_of_work.commit_all(changes, event, &command).await
    }
}
