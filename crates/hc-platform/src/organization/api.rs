//! Organizations API
//!
//! `/me/organizations` lists and bootstraps the caller's organizations;
//! `/organizations/{id}` covers one organization and its invitations.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::circle::{CircleListResponse, CircleRepository, CircleResponse};
use crate::invitation::operations::{CreateInvitationCommand, CreateInvitationUseCase};
use crate::invitation::{InvitationListResponse, InvitationRepository, InvitationResponse};
use crate::organization::operations::{
    CreateOrganizationCommand, CreateOrganizationUseCase, DeleteOrganizationCommand,
    DeleteOrganizationUseCase, UpdateOrganizationCommand, UpdateOrganizationUseCase,
};
use crate::organization::{Organization, OrganizationRepository};
use crate::partner::{PartnerListResponse, PartnerRepository};
use crate::shared::api_common::SuccessResponse;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;
use crate::user::{User, UserRepository};
use crate::usecase::{SqliteUnitOfWork, UseCaseResult};

/// Organization response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Organization> for OrganizationResponse {
    fn from(o: Organization) -> Self {
        Self {
            id: o.id,
            name: o.name,
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrganizationListResponse {
    pub items: Vec<OrganizationResponse>,
    pub total: usize,
}

impl From<Vec<Organization>> for OrganizationListResponse {
    fn from(organizations: Vec<Organization>) -> Self {
        let items: Vec<OrganizationResponse> = organizations.into_iter().map(Into::into).collect();
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvitationRequest {
    pub email: String,
}

#[derive(Clone)]
pub struct OrganizationsState {
    pub organization_repo: Arc<OrganizationRepository>,
    pub user_repo: Arc<UserRepository>,
    pub circle_repo: Arc<CircleRepository>,
    pub partner_repo: Arc<PartnerRepository>,
    pub invitation_repo: Arc<InvitationRepository>,
    pub create_use_case: Arc<CreateOrganizationUseCase<SqliteUnitOfWork>>,
    pub update_use_case: Arc<UpdateOrganizationUseCase<SqliteUnitOfWork>>,
    pub delete_use_case: Arc<DeleteOrganizationUseCase<SqliteUnitOfWork>>,
    pub create_invitation_use_case: Arc<CreateInvitationUseCase<SqliteUnitOfWork>>,
}

impl OrganizationsState {
    async fn current_user(&self, auth: &Authenticated) -> Result<User, PlatformError> {
        self.user_repo
            .find_active_by_external_id(auth.external_id())
            .await?
            .ok_or_else(|| PlatformError::not_found("User", auth.external_id()))
    }

    async fn live_organization(&self, id: &str) -> Result<Organization, PlatformError> {
        self.organization_repo
            .find_active(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Organization", id))
    }
}

/// List the caller's organizations
#[utoipa::path(
    get,
    path = "",
    tag = "organizations",
    responses(
        (status = 200, description = "Live organizations with a live partner for the caller", body = OrganizationListResponse),
        (status = 404, description = "Caller is not registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_organizations(
    State(state): State<OrganizationsState>,
    auth: Authenticated,
) -> Result<Json<OrganizationListResponse>, PlatformError> {
    let user = state.current_user(&auth).await?;
    let organizations = state.organization_repo.find_for_user(&user.id).await?;
    Ok(Json(organizations.into()))
}

/// Create an organization with the caller as admin
#[utoipa::path(
    post,
    path = "",
    tag = "organizations",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 201, description = "Organization created", body = OrganizationResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Caller is not registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_organization(
    State(state): State<OrganizationsState>,
    auth: Authenticated,
    Json(req): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<OrganizationResponse>), PlatformError> {
    let user = state.current_user(&auth).await?;
    let command = CreateOrganizationCommand {
        user_id: user.id,
        name: req.name,
    };

    match state.create_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(event) => {
            let organization = state.live_organization(&event.organization_id).await?;
            Ok((StatusCode::CREATED, Json(organization.into())))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Get organization by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Organization found", body = OrganizationResponse),
        (status = 404, description = "Organization not found or deleted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_organization(
    State(state): State<OrganizationsState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<OrganizationResponse>, PlatformError> {
    let organization = state.live_organization(&id).await?;
    Ok(Json(organization.into()))
}

/// Rename organization
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization ID")),
    request_body = UpdateOrganizationRequest,
    responses(
        (status = 200, description = "Organization updated", body = OrganizationResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_organization(
    State(state): State<OrganizationsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrganizationRequest>,
) -> Result<Json<OrganizationResponse>, PlatformError> {
    let command = UpdateOrganizationCommand {
        organization_id: id.clone(),
        name: req.name,
    };

    match state.update_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => {
            let organization = state.live_organization(&id).await?;
            Ok(Json(organization.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Soft-delete organization and all of its partners
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Organization deleted", body = SuccessResponse),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_organization(
    State(state): State<OrganizationsState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = DeleteOrganizationCommand { organization_id: id };

    match state.delete_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("Organization deleted"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Get the anchor circle
#[utoipa::path(
    get,
    path = "/{id}/anchor_circle",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Anchor circle", body = CircleResponse),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_anchor_circle(
    State(state): State<OrganizationsState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<CircleResponse>, PlatformError> {
    let organization = state.live_organization(&id).await?;
    let anchor = state
        .circle_repo
        .find_anchor(&organization.id)
        .await?
        .ok_or_else(|| PlatformError::NotFound {
            message: format!("Anchor circle of organization '{}' not found", organization.id),
        })?;
    Ok(Json(anchor.into()))
}

/// List live circles of the organization
#[utoipa::path(
    get,
    path = "/{id}/circles",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Live circles", body = CircleListResponse),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_organization_circles(
    State(state): State<OrganizationsState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<CircleListResponse>, PlatformError> {
    let organization = state.live_organization(&id).await?;
    let circles = state.circle_repo.find_by_organization(&organization.id).await?;
    Ok(Json(circles.into()))
}

/// List live partners of the organization
#[utoipa::path(
    get,
    path = "/{id}/members",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Live partners", body = PartnerListResponse),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_organization_members(
    State(state): State<OrganizationsState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<PartnerListResponse>, PlatformError> {
    let organization = state.live_organization(&id).await?;
    let partners = state.partner_repo.find_by_organization(&organization.id).await?;
    Ok(Json(partners.into()))
}

/// List live admin partners of the organization
#[utoipa::path(
    get,
    path = "/{id}/admins",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Live admins", body = PartnerListResponse),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_organization_admins(
    State(state): State<OrganizationsState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<PartnerListResponse>, PlatformError> {
    let organization = state.live_organization(&id).await?;
    let partners = state.partner_repo.find_admins(&organization.id).await?;
    Ok(Json(partners.into()))
}

/// List invitations of the organization
#[utoipa::path(
    get,
    path = "/{id}/invitations",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Invitations in any status", body = InvitationListResponse),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_organization_invitations(
    State(state): State<OrganizationsState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<InvitationListResponse>, PlatformError> {
    let organization = state.live_organization(&id).await?;
    let invitations = state.invitation_repo.find_by_organization(&organization.id).await?;
    Ok(Json(invitations.into()))
}

/// Invite someone by email
#[utoipa::path(
    post,
    path = "/{id}/invitations",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization ID")),
    request_body = CreateInvitationRequest,
    responses(
        (status = 201, description = "Invitation created", body = InvitationResponse),
        (status = 400, description = "Invalid email"),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_organization_invitation(
    State(state): State<OrganizationsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<InvitationResponse>), PlatformError> {
    let command = CreateInvitationCommand {
        organization_id: id,
        email: req.email,
    };

    match state.create_invitation_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(event) => {
            let invitation = state
                .invitation_repo
                .find_by_id(&event.invitation_id)
                .await?
                .ok_or_else(|| PlatformError::not_found("Invitation", &event.invitation_id))?;
            Ok((StatusCode::CREATED, Json(invitation.into())))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

pub fn my_organizations_router(state: OrganizationsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_my_organizations, create_organization))
        .with_state(state)
}

pub fn organizations_router(state: OrganizationsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_organization, update_organization, delete_organization))
        .routes(routes!(get_anchor_circle))
        .routes(routes!(list_organization_circles))
        .routes(routes!(list_organization_members))
        .routes(routes!(list_organization_admins))
        .routes(routes!(list_organization_invitations, create_organization_invitation))
        .with_state(state)
}
