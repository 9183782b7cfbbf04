//! Partners API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::circle::{CircleListResponse, CircleRepository};
use crate::partner::operations::{
    DeletePartnerCommand, DeletePartnerUseCase, SetPartnerTypeCommand, SetPartnerTypeUseCase,
    UpdatePartnerCommand, UpdatePartnerUseCase,
};
use crate::partner::{Partner, PartnerRepository, PartnerType};
use crate::role::{RoleListResponse, RoleRepository};
use crate::shared::api_common::SuccessResponse;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;
use crate::usecase::{SqliteUnitOfWork, UseCaseResult};

/// Partner response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartnerResponse {
    pub id: String,
    pub partner_type: PartnerType,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub is_active: bool,
    pub user_id: String,
    pub organization_id: String,
    pub invitation_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Partner> for PartnerResponse {
    fn from(p: Partner) -> Self {
        Self {
            id: p.id,
            partner_type: p.partner_type,
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            is_active: p.is_active,
            user_id: p.user_id,
            organization_id: p.organization_id,
            invitation_id: p.invitation_id,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartnerListResponse {
    pub items: Vec<PartnerResponse>,
    pub total: usize,
}

impl From<Vec<Partner>> for PartnerListResponse {
    fn from(partners: Vec<Partner>) -> Self {
        let items: Vec<PartnerResponse> = partners.into_iter().map(Into::into).collect();
        let total = items.len();
        Self { items, total }
    }
}

/// Update partner request; absent fields are left unchanged
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartnerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct PartnersState {
    pub partner_repo: Arc<PartnerRepository>,
    pub circle_repo: Arc<CircleRepository>,
    pub role_repo: Arc<RoleRepository>,
    pub update_use_case: Arc<UpdatePartnerUseCase<SqliteUnitOfWork>>,
    pub delete_use_case: Arc<DeletePartnerUseCase<SqliteUnitOfWork>>,
    pub set_type_use_case: Arc<SetPartnerTypeUseCase<SqliteUnitOfWork>>,
}

impl PartnersState {
    async fn live_partner(&self, id: &str) -> Result<Partner, PlatformError> {
        self.partner_repo
            .find_active(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Partner", id))
    }

    async fn set_type(
        &self,
        auth: Authenticated,
        id: String,
        partner_type: PartnerType,
    ) -> Result<Json<PartnerResponse>, PlatformError> {
        let command = SetPartnerTypeCommand {
            partner_id: id.clone(),
            partner_type,
        };

        match self.set_type_use_case.execute(command, auth.context()).await {
            UseCaseResult::Success(_event) => {
                let partner = self.live_partner(&id).await?;
                Ok(Json(partner.into()))
            }
            UseCaseResult::Failure(err) => Err(err.into()),
        }
    }
}

/// Get partner by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "partners",
    params(("id" = String, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Partner found", body = PartnerResponse),
        (status = 404, description = "Partner not found or deleted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_partner(
    State(state): State<PartnersState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<PartnerResponse>, PlatformError> {
    let partner = state.live_partner(&id).await?;
    Ok(Json(partner.into()))
}

/// Update partner
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "partners",
    params(("id" = String, Path, description = "Partner ID")),
    request_body = UpdatePartnerRequest,
    responses(
        (status = 200, description = "Partner updated", body = PartnerResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Partner not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_partner(
    State(state): State<PartnersState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdatePartnerRequest>,
) -> Result<Json<PartnerResponse>, PlatformError> {
    let command = UpdatePartnerCommand {
        partner_id: id.clone(),
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        is_active: req.is_active,
    };

    match state.update_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => {
            let partner = state.live_partner(&id).await?;
            Ok(Json(partner.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Soft-delete partner
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "partners",
    params(("id" = String, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Partner deleted", body = SuccessResponse),
        (status = 404, description = "Partner not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_partner(
    State(state): State<PartnersState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = DeletePartnerCommand { partner_id: id };

    match state.delete_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("Partner deleted"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Grant admin privileges
#[utoipa::path(
    put,
    path = "/{id}/admin",
    tag = "partners",
    params(("id" = String, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Partner is admin", body = PartnerResponse),
        (status = 404, description = "Partner not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn grant_admin(
    State(state): State<PartnersState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<PartnerResponse>, PlatformError> {
    state.set_type(auth, id, PartnerType::Admin).await
}

/// Revoke admin privileges
#[utoipa::path(
    delete,
    path = "/{id}/admin",
    tag = "partners",
    params(("id" = String, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Partner is member", body = PartnerResponse),
        (status = 404, description = "Partner not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn revoke_admin(
    State(state): State<PartnersState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<PartnerResponse>, PlatformError> {
    state.set_type(auth, id, PartnerType::Member).await
}

/// Circles the partner is a member of
#[utoipa::path(
    get,
    path = "/{id}/circles",
    tag = "partners",
    params(("id" = String, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Live circles", body = CircleListResponse),
        (status = 404, description = "Partner not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_partner_circles(
    State(state): State<PartnersState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<CircleListResponse>, PlatformError> {
    let partner = state.live_partner(&id).await?;
    let circles = state.circle_repo.find_by_partner(&partner.id).await?;
    Ok(Json(circles.into()))
}

/// Roles assigned to the partner
#[utoipa::path(
    get,
    path = "/{id}/roles",
    tag = "partners",
    params(("id" = String, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Assigned roles", body = RoleListResponse),
        (status = 404, description = "Partner not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_partner_roles(
    State(state): State<PartnersState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<RoleListResponse>, PlatformError> {
    let partner = state.live_partner(&id).await?;
    let roles = state.role_repo.find_by_partner(&partner.id).await?;
    Ok(Json(roles.into()))
}

pub fn partners_router(state: PartnersState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_partner, update_partner, delete_partner))
        .routes(routes!(grant_admin, revoke_admin))
        .routes(routes!(list_partner_circles))
        .routes(routes!(list_partner_roles))
        .with_state(state)
}
