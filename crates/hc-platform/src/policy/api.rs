//! Policies API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::policy::operations::{
    DeletePolicyCommand, DeletePolicyUseCase, UpdatePolicyCommand, UpdatePolicyUseCase,
};
use crate::policy::{Policy, PolicyRepository};
use crate::shared::api_common::SuccessResponse;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;
use crate::usecase::{SqliteUnitOfWork, UseCaseResult};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub domain_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Policy> for PolicyResponse {
    fn from(p: Policy) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            domain_id: p.domain_id,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PolicyListResponse {
    pub items: Vec<PolicyResponse>,
    pub total: usize,
}

impl From<Vec<Policy>> for PolicyListResponse {
    fn from(policies: Vec<Policy>) -> Self {
        let items: Vec<PolicyResponse> = policies.into_iter().map(Into::into).collect();
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePolicyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct PoliciesState {
    pub policy_repo: Arc<PolicyRepository>,
    pub update_use_case: Arc<UpdatePolicyUseCase<SqliteUnitOfWork>>,
    pub delete_use_case: Arc<DeletePolicyUseCase<SqliteUnitOfWork>>,
}

/// Get policy by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "policies",
    params(("id" = String, Path, description = "Policy ID")),
    responses(
        (status = 200, description = "Policy found", body = PolicyResponse),
        (status = 404, description = "Policy not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_policy(
    State(state): State<PoliciesState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<PolicyResponse>, PlatformError> {
    let policy = state
        .policy_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Policy", &id))?;
    Ok(Json(policy.into()))
}

/// Update policy
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "policies",
    params(("id" = String, Path, description = "Policy ID")),
    request_body = UpdatePolicyRequest,
    responses(
        (status = 200, description = "Policy updated", body = PolicyResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Policy not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_policy(
    State(state): State<PoliciesState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdatePolicyRequest>,
) -> Result<Json<PolicyResponse>, PlatformError> {
    let command = UpdatePolicyCommand {
        policy_id: id.clone(),
        title: req.title,
        description: req.description,
    };

    match state.update_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => {
            let policy = state
                .policy_repo
                .find_by_id(&id)
                .await?
                .ok_or_else(|| PlatformError::not_found("Policy", &id))?;
            Ok(Json(policy.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Delete policy
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "policies",
    params(("id" = String, Path, description = "Policy ID")),
    responses(
        (status = 200, description = "Policy deleted", body = SuccessResponse),
        (status = 404, description = "Policy not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_policy(
    State(state): State<PoliciesState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = DeletePolicyCommand { policy_id: id };

    match state.delete_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("Policy deleted"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

pub fn policies_router(state: PoliciesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_policy, update_policy, delete_policy))
        .with_state(state)
}
