//! Invitations API
//!
//! Creation and listing live under `/organizations/{id}/invitations`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::invitation::operations::{
    AcceptInvitationCommand, AcceptInvitationUseCase, CancelInvitationCommand,
    CancelInvitationUseCase, ResendInvitationCommand, ResendInvitationUseCase,
};
use crate::invitation::{Invitation, InvitationRepository, InvitationStatus};
use crate::partner::{PartnerRepository, PartnerResponse};
use crate::shared::api_common::SuccessResponse;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;
use crate::user::UserRepository;
use crate::usecase::{SqliteUnitOfWork, UseCaseResult};

/// Invitation response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: String,
    pub code: String,
    pub email: String,
    pub status: InvitationStatus,
    pub organization_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Invitation> for InvitationResponse {
    fn from(i: Invitation) -> Self {
        Self {
            id: i.id,
            code: i.code,
            email: i.email,
            status: i.status,
            organization_id: i.organization_id,
            created_at: i.created_at.to_rfc3339(),
            updated_at: i.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvitationListResponse {
    pub items: Vec<InvitationResponse>,
    pub total: usize,
}

impl From<Vec<Invitation>> for InvitationListResponse {
    fn from(invitations: Vec<Invitation>) -> Self {
        let items: Vec<InvitationResponse> = invitations.into_iter().map(Into::into).collect();
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Clone)]
pub struct InvitationsState {
    pub invitation_repo: Arc<InvitationRepository>,
    pub user_repo: Arc<UserRepository>,
    pub partner_repo: Arc<PartnerRepository>,
    pub accept_use_case: Arc<AcceptInvitationUseCase<SqliteUnitOfWork>>,
    pub cancel_use_case: Arc<CancelInvitationUseCase<SqliteUnitOfWork>>,
    pub resend_use_case: Arc<ResendInvitationUseCase>,
}

/// Get invitation by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "invitations",
    params(("id" = String, Path, description = "Invitation ID")),
    responses(
        (status = 200, description = "Invitation found", body = InvitationResponse),
        (status = 404, description = "Invitation not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_invitation(
    State(state): State<InvitationsState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<InvitationResponse>, PlatformError> {
    let invitation = state
        .invitation_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Invitation", &id))?;
    Ok(Json(invitation.into()))
}

/// Resend invitation
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "invitations",
    params(("id" = String, Path, description = "Invitation ID")),
    responses(
        (status = 501, description = "Not implemented")
    ),
    security(("bearer_auth" = []))
)]
pub async fn resend_invitation(
    State(state): State<InvitationsState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<InvitationResponse>, PlatformError> {
    let command = ResendInvitationCommand { invitation_id: id.clone() };

    match state.resend_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(()) => {
            let invitation = state
                .invitation_repo
                .find_by_id(&id)
                .await?
                .ok_or_else(|| PlatformError::not_found("Invitation", &id))?;
            Ok(Json(invitation.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Cancel invitation
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "invitations",
    params(("id" = String, Path, description = "Invitation ID")),
    responses(
        (status = 200, description = "Invitation cancelled", body = SuccessResponse),
        (status = 404, description = "Invitation not found"),
        (status = 409, description = "Invitation already accepted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_invitation(
    State(state): State<InvitationsState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = CancelInvitationCommand { invitation_id: id };

    match state.cancel_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("Invitation cancelled"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Accept invitation by code; the caller joins the organization
#[utoipa::path(
    get,
    path = "/{id}/accept",
    tag = "invitations",
    params(("id" = String, Path, description = "Invitation code")),
    responses(
        (status = 200, description = "Caller's partner", body = PartnerResponse),
        (status = 404, description = "Unknown code or caller not registered"),
        (status = 409, description = "Invitation cancelled, used by someone else, or caller already a partner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn accept_invitation(
    State(state): State<InvitationsState>,
    auth: Authenticated,
    Path(code): Path<String>,
) -> Result<Json<PartnerResponse>, PlatformError> {
    let user = state
        .user_repo
        .find_active_by_external_id(auth.external_id())
        .await?
        .ok_or_else(|| PlatformError::not_found("User", auth.external_id()))?;

    let command = AcceptInvitationCommand {
        code,
        user_id: user.id,
    };

    match state.accept_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(event) => {
            let partner = state
                .partner_repo
                .find_active(&event.partner_id)
                .await?
                .ok_or_else(|| PlatformError::not_found("Partner", &event.partner_id))?;
            Ok(Json(partner.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

pub fn invitations_router(state: InvitationsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_invitation, resend_invitation, cancel_invitation))
        .routes(routes!(accept_invitation))
        .with_state(state)
}
