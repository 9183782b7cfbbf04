//! Accountabilities API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::accountability::operations::{
    DeleteAccountabilityCommand, DeleteAccountabilityUseCase, UpdateAccountabilityCommand,
    UpdateAccountabilityUseCase,
};
use crate::accountability::{Accountability, AccountabilityRepository};
use crate::shared::api_common::SuccessResponse;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;
use crate::usecase::{SqliteUnitOfWork, UseCaseResult};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountabilityResponse {
    pub id: String,
    pub title: String,
    pub role_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Accountability> for AccountabilityResponse {
    fn from(a: Accountability) -> Self {
        Self {
            id: a.id,
            title: a.title,
            role_id: a.role_id,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountabilityListResponse {
    pub items: Vec<AccountabilityResponse>,
    pub total: usize,
}

impl From<Vec<Accountability>> for AccountabilityListResponse {
    fn from(accountabilities: Vec<Accountability>) -> Self {
        let items: Vec<AccountabilityResponse> =
            accountabilities.into_iter().map(Into::into).collect();
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAccountabilityRequest {
    pub title: String,
}

#[derive(Clone)]
pub struct AccountabilitiesState {
    pub accountability_repo: Arc<AccountabilityRepository>,
    pub update_use_case: Arc<UpdateAccountabilityUseCase<SqliteUnitOfWork>>,
    pub delete_use_case: Arc<DeleteAccountabilityUseCase<SqliteUnitOfWork>>,
}

impl AccountabilitiesState {
    async fn accountability(&self, id: &str) -> Result<Accountability, PlatformError> {
        self.accountability_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Accountability", id))
    }
}

/// Get accountability by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "accountabilities",
    params(("id" = String, Path, description = "Accountability ID")),
    responses(
        (status = 200, description = "Accountability found", body = AccountabilityResponse),
        (status = 404, description = "Accountability not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_accountability(
    State(state): State<AccountabilitiesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<AccountabilityResponse>, PlatformError> {
    let accountability = state.accountability(&id).await?;
    Ok(Json(accountability.into()))
}

/// Retitle accountability
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "accountabilities",
    params(("id" = String, Path, description = "Accountability ID")),
    request_body = UpdateAccountabilityRequest,
    responses(
        (status = 200, description = "Accountability updated", body = AccountabilityResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Accountability not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_accountability(
    State(state): State<AccountabilitiesState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdateAccountabilityRequest>,
) -> Result<Json<AccountabilityResponse>, PlatformError> {
    let command = UpdateAccountabilityCommand {
        accountability_id: id.clone(),
        title: req.title,
    };

    match state.update_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => {
            let accountability = state.accountability(&id).await?;
            Ok(Json(accountability.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Delete accountability
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "accountabilities",
    params(("id" = String, Path, description = "Accountability ID")),
    responses(
        (status = 200, description = "Accountability deleted", body = SuccessResponse),
        (status = 404, description = "Accountability not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_accountability(
    State(state): State<AccountabilitiesState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = DeleteAccountabilityCommand { accountability_id: id };

    match state.delete_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("Accountability deleted"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

pub fn accountabilities_router(state: AccountabilitiesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_accountability, update_accountability, delete_accountability))
        .with_state(state)
}
