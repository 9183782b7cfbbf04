//! Circles API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::circle::operations::{
    AddCircleMemberCommand, AddCircleMemberUseCase, CreateCircleCommand, CreateCircleUseCase,
    DeleteCircleCommand, DeleteCircleUseCase, RemoveCircleMemberCommand,
    RemoveCircleMemberUseCase, UpdateCircleCommand, UpdateCircleUseCase,
};
use crate::circle::{Circle, CircleRepository};
use crate::partner::{PartnerListResponse, PartnerRepository, PartnerResponse};
use crate::role::operations::{CreateRoleCommand, CreateRoleUseCase};
use crate::role::{RoleListResponse, RoleRepository, RoleResponse, RoleType};
use crate::shared::api_common::SuccessResponse;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;
use crate::usecase::{SqliteUnitOfWork, UseCaseResult};

/// Circle response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CircleResponse {
    pub id: String,
    pub name: String,
    pub purpose: Option<String>,
    pub organization_id: String,
    /// Absent for the anchor circle
    pub parent_circle_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Circle> for CircleResponse {
    fn from(c: Circle) -> Self {
        Self {
            id: c.id,
            name: c.name,
            purpose: c.purpose,
            organization_id: c.organization_id,
            parent_circle_id: c.parent_circle_id,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CircleListResponse {
    pub items: Vec<CircleResponse>,
    pub total: usize,
}

impl From<Vec<Circle>> for CircleListResponse {
    fn from(circles: Vec<Circle>) -> Self {
        let items: Vec<CircleResponse> = circles.into_iter().map(Into::into).collect();
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCircleRequest {
    pub name: String,
    pub purpose: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCircleRequest {
    pub name: Option<String>,
    pub purpose: Option<String>,
}

/// Create role request; `roleType` defaults to `custom`
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub name: String,
    pub purpose: Option<String>,
    pub role_type: Option<RoleType>,
}

#[derive(Clone)]
pub struct CirclesState {
    pub circle_repo: Arc<CircleRepository>,
    pub role_repo: Arc<RoleRepository>,
    pub partner_repo: Arc<PartnerRepository>,
    pub create_use_case: Arc<CreateCircleUseCase<SqliteUnitOfWork>>,
    pub update_use_case: Arc<UpdateCircleUseCase<SqliteUnitOfWork>>,
    pub delete_use_case: Arc<DeleteCircleUseCase<SqliteUnitOfWork>>,
    pub create_role_use_case: Arc<CreateRoleUseCase<SqliteUnitOfWork>>,
    pub add_member_use_case: Arc<AddCircleMemberUseCase<SqliteUnitOfWork>>,
    pub remove_member_use_case: Arc<RemoveCircleMemberUseCase<SqliteUnitOfWork>>,
}

impl CirclesState {
    async fn live_circle(&self, id: &str) -> Result<Circle, PlatformError> {
        self.circle_repo
            .find_active(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Circle", id))
    }
}

/// Get circle by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "circles",
    params(("id" = String, Path, description = "Circle ID")),
    responses(
        (status = 200, description = "Circle found", body = CircleResponse),
        (status = 404, description = "Circle not found or deleted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_circle(
    State(state): State<CirclesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<CircleResponse>, PlatformError> {
    let circle = state.live_circle(&id).await?;
    Ok(Json(circle.into()))
}

/// Update circle
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "circles",
    params(("id" = String, Path, description = "Circle ID")),
    request_body = UpdateCircleRequest,
    responses(
        (status = 200, description = "Circle updated", body = CircleResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Circle not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_circle(
    State(state): State<CirclesState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdateCircleRequest>,
) -> Result<Json<CircleResponse>, PlatformError> {
    let command = UpdateCircleCommand {
        circle_id: id.clone(),
        name: req.name,
        purpose: req.purpose,
    };

    match state.update_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => {
            let circle = state.live_circle(&id).await?;
            Ok(Json(circle.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Soft-delete circle
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "circles",
    params(("id" = String, Path, description = "Circle ID")),
    responses(
        (status = 200, description = "Circle deleted", body = SuccessResponse),
        (status = 404, description = "Circle not found"),
        (status = 409, description = "Anchor circle")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_circle(
    State(state): State<CirclesState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = DeleteCircleCommand { circle_id: id };

    match state.delete_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("Circle deleted"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List child circles
#[utoipa::path(
    get,
    path = "/{id}/circles",
    tag = "circles",
    params(("id" = String, Path, description = "Parent circle ID")),
    responses(
        (status = 200, description = "Live child circles", body = CircleListResponse),
        (status = 404, description = "Circle not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_child_circles(
    State(state): State<CirclesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<CircleListResponse>, PlatformError> {
    let circle = state.live_circle(&id).await?;
    let children = state.circle_repo.find_children(&circle.id).await?;
    Ok(Json(children.into()))
}

/// Create child circle
#[utoipa::path(
    post,
    path = "/{id}/circles",
    tag = "circles",
    params(("id" = String, Path, description = "Parent circle ID")),
    request_body = CreateCircleRequest,
    responses(
        (status = 201, description = "Circle created", body = CircleResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Parent circle not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_child_circle(
    State(state): State<CirclesState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<CreateCircleRequest>,
) -> Result<(StatusCode, Json<CircleResponse>), PlatformError> {
    let command = CreateCircleCommand {
        parent_circle_id: id,
        name: req.name,
        purpose: req.purpose,
    };

    match state.create_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(event) => {
            let circle = state.live_circle(&event.circle_id).await?;
            Ok((StatusCode::CREATED, Json(circle.into())))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List roles of the circle
#[utoipa::path(
    get,
    path = "/{id}/roles",
    tag = "circles",
    params(("id" = String, Path, description = "Circle ID")),
    responses(
        (status = 200, description = "Roles", body = RoleListResponse),
        (status = 404, description = "Circle not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_circle_roles(
    State(state): State<CirclesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<RoleListResponse>, PlatformError> {
    let circle = state.live_circle(&id).await?;
    let roles = state.role_repo.find_by_circle(&circle.id).await?;
    Ok(Json(roles.into()))
}

/// Create a custom or rep link role in the circle
#[utoipa::path(
    post,
    path = "/{id}/roles",
    tag = "circles",
    params(("id" = String, Path, description = "Circle ID")),
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 400, description = "Validation error or role type not allowed"),
        (status = 404, description = "Circle not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_circle_role(
    State(state): State<CirclesState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), PlatformError> {
    let command = CreateRoleCommand {
        circle_id: id,
        name: req.name,
        purpose: req.purpose,
        role_type: req.role_type,
    };

    match state.create_role_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(event) => {
            let role = state
                .role_repo
                .find_by_id(&event.role_id)
                .await?
                .ok_or_else(|| PlatformError::not_found("Role", &event.role_id))?;
            Ok((StatusCode::CREATED, Json(role.into())))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List circle members
#[utoipa::path(
    get,
    path = "/{id}/members",
    tag = "circles",
    params(("id" = String, Path, description = "Circle ID")),
    responses(
        (status = 200, description = "Live member partners", body = PartnerListResponse),
        (status = 404, description = "Circle not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_circle_members(
    State(state): State<CirclesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<PartnerListResponse>, PlatformError> {
    let circle = state.live_circle(&id).await?;
    let partners = state.partner_repo.find_by_circle(&circle.id).await?;
    Ok(Json(partners.into()))
}

/// Check membership; 404 when the partner is not a member
#[utoipa::path(
    get,
    path = "/{id}/members/{partner_id}",
    tag = "circles",
    params(
        ("id" = String, Path, description = "Circle ID"),
        ("partner_id" = String, Path, description = "Partner ID")
    ),
    responses(
        (status = 200, description = "Partner is a member", body = PartnerResponse),
        (status = 404, description = "Circle, partner or membership not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_circle_member(
    State(state): State<CirclesState>,
    _auth: Authenticated,
    Path((id, partner_id)): Path<(String, String)>,
) -> Result<Json<PartnerResponse>, PlatformError> {
    let circle = state.live_circle(&id).await?;
    let partner = state
        .partner_repo
        .find_active(&partner_id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Partner", &partner_id))?;

    if !state.circle_repo.is_member(&circle.id, &partner.id).await? {
        return Err(PlatformError::NotFound {
            message: format!("Partner '{}' is not a member of circle '{}'", partner.id, circle.id),
        });
    }
    Ok(Json(partner.into()))
}

/// Add partner to circle (idempotent)
#[utoipa::path(
    put,
    path = "/{id}/members/{partner_id}",
    tag = "circles",
    params(
        ("id" = String, Path, description = "Circle ID"),
        ("partner_id" = String, Path, description = "Partner ID")
    ),
    responses(
        (status = 200, description = "Partner is a member", body = PartnerResponse),
        (status = 404, description = "Circle or partner not found"),
        (status = 409, description = "Different organizations")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_circle_member(
    State(state): State<CirclesState>,
    auth: Authenticated,
    Path((id, partner_id)): Path<(String, String)>,
) -> Result<Json<PartnerResponse>, PlatformError> {
    let command = AddCircleMemberCommand {
        circle_id: id,
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

/// Remove partner from circle
#[utoipa::path(
    delete,
    path = "/{id}/members/{partner_id}",
    tag = "circles",
    params(
        ("id" = String, Path, description = "Circle ID"),
        ("partner_id" = String, Path, description = "Partner ID")
    ),
    responses(
        (status = 200, description = "Membership removed", body = SuccessResponse),
        (status = 404, description = "Circle, partner or membership not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_circle_member(
    State(state): State<CirclesState>,
    auth: Authenticated,
    Path((id, partner_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = RemoveCircleMemberCommand {
        circle_id: id,
        partner_id,
    };

    match state.remove_member_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("Membership removed"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

pub fn circles_router(state: CirclesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_circle, update_circle, delete_circle))
        .routes(routes!(list_child_circles, create_child_circle))
        .routes(routes!(list_circle_roles, create_circle_role))
        .routes(routes!(list_circle_members))
        .routes(routes!(get_circle_member, add_circle_member, remove_circle_member))
        .with_state(state)
}
