//! Roles API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::accountability::operations::{CreateAccountabilityCommand, CreateAccountabilityUseCase};
use crate::accountability::{AccountabilityListResponse, AccountabilityRepository, AccountabilityResponse};
use crate::circle::{CircleRepository, CircleResponse};
use crate::domain::operations::{CreateDomainCommand, CreateDomainUseCase};
use crate::domain::{DomainListResponse, DomainRepository, DomainResponse};
use crate::partner::{PartnerListResponse, PartnerRepository, PartnerResponse};
use crate::role::operations::{
    AddRoleMemberCommand, AddRoleMemberUseCase, CollapseRoleCommand, CollapseRoleUseCase,
    DeleteRoleCommand, DeleteRoleUseCase, ExpandRoleCommand, ExpandRoleUseCase,
    RemoveRoleMemberCommand, RemoveRoleMemberUseCase, UpdateRoleCommand, UpdateRoleUseCase,
};
use crate::role::{Role, RoleRepository, RoleType};
use crate::shared::api_common::SuccessResponse;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;
use crate::usecase::{SqliteUnitOfWork, UseCaseResult};

/// Role response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub purpose: Option<String>,
    pub role_type: RoleType,
    pub parent_circle_id: Option<String>,
    /// Set when the role represents a sub-circle
    pub circle_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Role> for RoleResponse {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            name: r.name,
            purpose: r.purpose,
            role_type: r.role_type,
            parent_circle_id: r.parent_circle_id,
            circle_id: r.circle_id,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleListResponse {
    pub items: Vec<RoleResponse>,
    pub total: usize,
}

impl From<Vec<Role>> for RoleListResponse {
    fn from(roles: Vec<Role>) -> Self {
        let items: Vec<RoleResponse> = roles.into_iter().map(Into::into).collect();
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub purpose: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTitledRequest {
    pub title: String,
}

#[derive(Clone)]
pub struct RolesState {
    pub role_repo: Arc<RoleRepository>,
    pub circle_repo: Arc<CircleRepository>,
    pub partner_repo: Arc<PartnerRepository>,
    pub domain_repo: Arc<DomainRepository>,
    pub accountability_repo: Arc<AccountabilityRepository>,
    pub update_use_case: Arc<UpdateRoleUseCase<SqliteUnitOfWork>>,
    pub delete_use_case: Arc<DeleteRoleUseCase<SqliteUnitOfWork>>,
    pub add_member_use_case: Arc<AddRoleMemberUseCase<SqliteUnitOfWork>>,
    pub remove_member_use_case: Arc<RemoveRoleMemberUseCase<SqliteUnitOfWork>>,
    pub expand_use_case: Arc<ExpandRoleUseCase<SqliteUnitOfWork>>,
    pub collapse_use_case: Arc<CollapseRoleUseCase>,
    pub create_domain_use_case: Arc<CreateDomainUseCase<SqliteUnitOfWork>>,
    pub create_accountability_use_case: Arc<CreateAccountabilityUseCase<SqliteUnitOfWork>>,
}

impl RolesState {
    async fn role(&self, id: &str) -> Result<Role, PlatformError> {
        self.role_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Role", id))
    }
}

/// Get role by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role found", body = RoleResponse),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_role(
    State(state): State<RolesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<RoleResponse>, PlatformError> {
    let role = state.role(&id).await?;
    Ok(Json(role.into()))
}

/// Update role
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<RoleResponse>, PlatformError> {
    let command = UpdateRoleCommand {
        role_id: id.clone(),
        name: req.name,
        purpose: req.purpose,
    };

    match state.update_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => {
            let role = state.role(&id).await?;
            Ok(Json(role.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Delete a custom or rep link role
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted", body = SuccessResponse),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Core or circle role")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_role(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = DeleteRoleCommand { role_id: id };

    match state.delete_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("Role deleted"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List partners assigned to the role
#[utoipa::path(
    get,
    path = "/{id}/members",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Assigned partners", body = PartnerListResponse),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_role_members(
    State(state): State<RolesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<PartnerListResponse>, PlatformError> {
    let role = state.role(&id).await?;
    let partners = state.partner_repo.find_by_role(&role.id).await?;
    Ok(Json(partners.into()))
}

/// Check assignment; 404 when the partner is not assigned
#[utoipa::path(
    get,
    path = "/{id}/members/{partner_id}",
    tag = "roles",
    params(
        ("id" = String, Path, description = "Role ID"),
        ("partner_id" = String, Path, description = "Partner ID")
    ),
    responses(
        (status = 200, description = "Partner is assigned", body = PartnerResponse),
        (status = 404, description = "Role, partner or assignment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_role_member(
    State(state): State<RolesState>,
    _auth: Authenticated,
    Path((id, partner_id)): Path<(String, String)>,
) -> Result<Json<PartnerResponse>, PlatformError> {
    let role = state.role(&id).await?;
    let partner = state
        .partner_repo
        .find_active(&partner_id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Partner", &partner_id))?;

    if !state.role_repo.is_assigned(&role.id, &partner.id).await? {
        return Err(PlatformError::NotFound {
            message: format!("Partner '{}' is not assigned to role '{}'", partner.id, role.id),
        });
    }
    Ok(Json(partner.into()))
}

/// Assign partner to role (idempotent)
#[utoipa::path(
    put,
    path = "/{id}/members/{partner_id}",
    tag = "roles",
    params(
        ("id" = String, Path, description = "Role ID"),
        ("partner_id" = String, Path, description = "Partner ID")
    ),
    responses(
        (status = 200, description = "Partner is assigned", body = PartnerResponse),
        (status = 404, description = "Role or partner not found"),
        (status = 409, description = "Different organizations")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_role_member(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path((id, partner_id)): Path<(String, String)>,
) -> Result<Json<PartnerResponse>, PlatformError> {
    let command = AddRoleMemberCommand {
        role_id: id,
        partner_id: partner_id.clone(),
    };

    match state.add_member_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => {
            let partner = state
                .partner_repo
                .find_active(&partner_id)
                .await?
                .ok_or_else(|| PlatformError::not_found("Partner", &partner_id))?;
            Ok(Json(partner.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Unassign partner from role
#[utoipa::path(
    delete,
    path = "/{id}/members/{partner_id}",
    tag = "roles",
    params(
        ("id" = String, Path, description = "Role ID"),
        ("partner_id" = String, Path, description = "Partner ID")
    ),
    responses(
        (status = 200, description = "Assignment removed", body = SuccessResponse),
        (status = 404, description = "Role, partner or assignment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_role_member(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path((id, partner_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = RemoveRoleMemberCommand {
        role_id: id,
        partner_id,
    };

    match state.remove_member_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("Assignment removed"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List domains of the role
#[utoipa::path(
    get,
    path = "/{id}/domains",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Domains", body = DomainListResponse),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_role_domains(
    State(state): State<RolesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<DomainListResponse>, PlatformError> {
    let role = state.role(&id).await?;
    let domains = state.domain_repo.find_by_role(&role.id).await?;
    Ok(Json(domains.into()))
}

/// Create a domain for the role
#[utoipa::path(
    post,
    path = "/{id}/domains",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    request_body = CreateTitledRequest,
    responses(
        (status = 201, description = "Domain created", body = DomainResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_role_domain(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<CreateTitledRequest>,
) -> Result<(StatusCode, Json<DomainResponse>), PlatformError> {
    let command = CreateDomainCommand {
        role_id: id,
        title: req.title,
    };

    match state.create_domain_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(event) => {
            let domain = state
                .domain_repo
                .find_by_id(&event.domain_id)
                .await?
                .ok_or_else(|| PlatformError::not_found("Domain", &event.domain_id))?;
            Ok((StatusCode::CREATED, Json(domain.into())))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List accountabilities of the role
#[utoipa::path(
    get,
    path = "/{id}/accountabilities",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Accountabilities", body = AccountabilityListResponse),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_role_accountabilities(
    State(state): State<RolesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<AccountabilityListResponse>, PlatformError> {
    let role = state.role(&id).await?;
    let accountabilities = state.accountability_repo.find_by_role(&role.id).await?;
    Ok(Json(accountabilities.into()))
}

/// Create an accountability for the role
#[utoipa::path(
    post,
    path = "/{id}/accountabilities",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    request_body = CreateTitledRequest,
    responses(
        (status = 201, description = "Accountability created", body = AccountabilityResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_role_accountability(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<CreateTitledRequest>,
) -> Result<(StatusCode, Json<AccountabilityResponse>), PlatformError> {
    let command = CreateAccountabilityCommand {
        role_id: id,
        title: req.title,
    };

    match state.create_accountability_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(event) => {
            let accountability = state
                .accountability_repo
                .find_by_id(&event.accountability_id)
                .await?
                .ok_or_else(|| PlatformError::not_found("Accountability", &event.accountability_id))?;
            Ok((StatusCode::CREATED, Json(accountability.into())))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Circle the role stands for
#[utoipa::path(
    get,
    path = "/{id}/circle",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Sub-circle", body = CircleResponse),
        (status = 404, description = "Role not found or not a circle")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_role_circle(
    State(state): State<RolesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<CircleResponse>, PlatformError> {
    let role = state.role(&id).await?;
    let circle_id = role.circle_id.ok_or_else(|| PlatformError::NotFound {
        message: format!("Role '{}' does not represent a circle", role.id),
    })?;
    let circle = state
        .circle_repo
        .find_active(&circle_id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Circle", &circle_id))?;
    Ok(Json(circle.into()))
}

/// Expand the role into a sub-circle
#[utoipa::path(
    post,
    path = "/{id}/circle",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 201, description = "Sub-circle created", body = CircleResponse),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role already a circle or not expandable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn expand_role(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<CircleResponse>), PlatformError> {
    let command = ExpandRoleCommand { role_id: id };

    match state.expand_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(event) => {
            let circle = state
                .circle_repo
                .find_active(&event.circle_id)
                .await?
                .ok_or_else(|| PlatformError::not_found("Circle", &event.circle_id))?;
            Ok((StatusCode::CREATED, Json(circle.into())))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Collapse the sub-circle back into a role
#[utoipa::path(
    delete,
    path = "/{id}/circle",
    tag = "roles",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 501, description = "Not implemented")
    ),
    security(("bearer_auth" = []))
)]
pub async fn collapse_role(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = CollapseRoleCommand { role_id: id };

    match state.collapse_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(()) => Ok(Json(SuccessResponse::ok("Role collapsed"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

pub fn roles_router(state: RolesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_role, update_role, delete_role))
        .routes(routes!(list_role_members))
        .routes(routes!(get_role_member, add_role_member, remove_role_member))
        .routes(routes!(list_role_domains, create_role_domain))
        .routes(routes!(list_role_accountabilities, create_role_accountability))
        .routes(routes!(get_role_circle, expand_role, collapse_role))
        .with_state(state)
}
